//! Order-statistics tree shared by the hypervolume and attainment sweeps.
//!
//! An AVL tree over `(key, insertion order)` pairs, augmented with subtree
//! counts and subtree payload minima. The double insertion-order tiebreak
//! makes duplicate keys a total order, so sweep results stay deterministic
//! regardless of how ties arrive. Nodes live in an arena indexed by `u32`
//! handles; removed slots are recycled through a free list, and the whole
//! tree is built and dropped within a single computation.

use core::cmp::Ordering;

const NIL: u32 = u32::MAX;

/// Map `-0.0` onto `0.0` so the bitwise total order agrees with numeric
/// comparison for every finite key.
fn canon(v: f64) -> f64 {
    if v.to_bits() == (-0.0_f64).to_bits() {
        0.0
    } else {
        v
    }
}

#[derive(Debug)]
struct Node {
    key: f64,
    seq: u64,
    payload: f64,
    left: u32,
    right: u32,
    height: u32,
    count: u32,
    min_payload: f64,
}

/// Balanced tree over `(key, seq)` entries carrying an `f64` payload.
///
/// Keys and payloads must be finite; callers validate their inputs before
/// any tree is built.
#[derive(Debug, Default)]
pub(crate) struct OsTree {
    nodes: Vec<Node>,
    free: Vec<u32>,
    root: u32,
    next_seq: u64,
}

impl OsTree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NIL,
            next_seq: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.count(self.root) as usize
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Insert an entry; equal keys order by insertion.
    pub(crate) fn insert(&mut self, key: f64, payload: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let idx = self.alloc(canon(key), seq, payload);
        self.root = self.insert_at(self.root, idx);
    }

    /// Remove the earliest-inserted entry with this exact key.
    ///
    /// Returns false if no entry carries the key.
    pub(crate) fn remove(&mut self, key: f64) -> bool {
        let key = canon(key);
        let Some(seq) = self.first_seq_of(key) else {
            return false;
        };
        self.root = self.remove_at(self.root, key, seq);
        true
    }

    /// Rank query: number of entries with key `<= x`.
    pub(crate) fn count_le(&self, x: f64) -> usize {
        self.count_below(x, false)
    }

    /// Number of entries with key strictly `< x`.
    pub(crate) fn count_lt(&self, x: f64) -> usize {
        self.count_below(x, true)
    }

    /// The `i`-th smallest entry (0-based) as `(key, payload)`.
    pub(crate) fn select(&self, i: usize) -> Option<(f64, f64)> {
        if i >= self.len() {
            return None;
        }
        let mut cur = self.root;
        let mut i = i;
        loop {
            let n = &self.nodes[cur as usize];
            let left_count = self.count(n.left) as usize;
            match i.cmp(&left_count) {
                Ordering::Less => cur = n.left,
                Ordering::Equal => return Some((n.key, n.payload)),
                Ordering::Greater => {
                    i -= left_count + 1;
                    cur = n.right;
                }
            }
        }
    }

    /// Minimum payload among entries with key `<= x`, if any.
    pub(crate) fn min_payload_le(&self, x: f64) -> Option<f64> {
        let best = self.prefix_min(self.root, canon(x), false);
        best.is_finite().then_some(best)
    }

    /// Minimum payload among entries with key strictly `< x`, if any.
    pub(crate) fn min_payload_lt(&self, x: f64) -> Option<f64> {
        let best = self.prefix_min(self.root, canon(x), true);
        best.is_finite().then_some(best)
    }

    /// Extremum-in-range query: minimum payload among keys in `[lo, hi]`.
    pub(crate) fn min_payload_in_range(&self, lo: f64, hi: f64) -> Option<f64> {
        let best = self.range_min(self.root, canon(lo), canon(hi));
        best.is_finite().then_some(best)
    }

    // ---- internal: queries ----

    fn count_below(&self, x: f64, strict: bool) -> usize {
        let x = canon(x);
        let mut acc = 0;
        let mut cur = self.root;
        while cur != NIL {
            let n = &self.nodes[cur as usize];
            let qualifies = match n.key.total_cmp(&x) {
                Ordering::Less => true,
                Ordering::Equal => !strict,
                Ordering::Greater => false,
            };
            if qualifies {
                acc += self.count(n.left) as usize + 1;
                cur = n.right;
            } else {
                cur = n.left;
            }
        }
        acc
    }

    fn prefix_min(&self, idx: u32, x: f64, strict: bool) -> f64 {
        if idx == NIL {
            return f64::INFINITY;
        }
        let n = &self.nodes[idx as usize];
        let qualifies = match n.key.total_cmp(&x) {
            Ordering::Less => true,
            Ordering::Equal => !strict,
            Ordering::Greater => false,
        };
        if qualifies {
            n.payload
                .min(self.min_payload(n.left))
                .min(self.prefix_min(n.right, x, strict))
        } else {
            self.prefix_min(n.left, x, strict)
        }
    }

    fn suffix_min(&self, idx: u32, x: f64) -> f64 {
        if idx == NIL {
            return f64::INFINITY;
        }
        let n = &self.nodes[idx as usize];
        if n.key.total_cmp(&x) == Ordering::Less {
            self.suffix_min(n.right, x)
        } else {
            n.payload
                .min(self.min_payload(n.right))
                .min(self.suffix_min(n.left, x))
        }
    }

    fn range_min(&self, idx: u32, lo: f64, hi: f64) -> f64 {
        if idx == NIL {
            return f64::INFINITY;
        }
        let n = &self.nodes[idx as usize];
        if n.key.total_cmp(&lo) == Ordering::Less {
            return self.range_min(n.right, lo, hi);
        }
        if n.key.total_cmp(&hi) == Ordering::Greater {
            return self.range_min(n.left, lo, hi);
        }
        n.payload
            .min(self.suffix_min(n.left, lo))
            .min(self.prefix_min(n.right, hi, false))
    }

    fn first_seq_of(&self, key: f64) -> Option<u64> {
        let mut cur = self.root;
        let mut found = None;
        while cur != NIL {
            let n = &self.nodes[cur as usize];
            match key.total_cmp(&n.key) {
                Ordering::Less => cur = n.left,
                Ordering::Greater => cur = n.right,
                Ordering::Equal => {
                    found = Some(n.seq);
                    cur = n.left;
                }
            }
        }
        found
    }

    // ---- internal: structure ----

    fn count(&self, idx: u32) -> u32 {
        if idx == NIL {
            0
        } else {
            self.nodes[idx as usize].count
        }
    }

    fn height(&self, idx: u32) -> u32 {
        if idx == NIL {
            0
        } else {
            self.nodes[idx as usize].height
        }
    }

    fn min_payload(&self, idx: u32) -> f64 {
        if idx == NIL {
            f64::INFINITY
        } else {
            self.nodes[idx as usize].min_payload
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn alloc(&mut self, key: f64, seq: u64, payload: f64) -> u32 {
        let node = Node {
            key,
            seq,
            payload,
            left: NIL,
            right: NIL,
            height: 1,
            count: 1,
            min_payload: payload,
        };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx as usize] = node;
            idx
        } else {
            // Sweep arenas hold one node per live point, far below u32 range.
            let idx = self.nodes.len() as u32;
            self.nodes.push(node);
            idx
        }
    }

    fn release(&mut self, idx: u32) {
        self.free.push(idx);
    }

    fn entry_lt(&self, a: u32, b: u32) -> bool {
        let (na, nb) = (&self.nodes[a as usize], &self.nodes[b as usize]);
        match na.key.total_cmp(&nb.key) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => na.seq < nb.seq,
        }
    }

    fn pull(&mut self, idx: u32) {
        let (left, right) = {
            let n = &self.nodes[idx as usize];
            (n.left, n.right)
        };
        let height = 1 + self.height(left).max(self.height(right));
        let count = 1 + self.count(left) + self.count(right);
        let min_payload = self.nodes[idx as usize]
            .payload
            .min(self.min_payload(left))
            .min(self.min_payload(right));
        let n = &mut self.nodes[idx as usize];
        n.height = height;
        n.count = count;
        n.min_payload = min_payload;
    }

    fn rotate_right(&mut self, idx: u32) -> u32 {
        let l = self.nodes[idx as usize].left;
        self.nodes[idx as usize].left = self.nodes[l as usize].right;
        self.nodes[l as usize].right = idx;
        self.pull(idx);
        self.pull(l);
        l
    }

    fn rotate_left(&mut self, idx: u32) -> u32 {
        let r = self.nodes[idx as usize].right;
        self.nodes[idx as usize].right = self.nodes[r as usize].left;
        self.nodes[r as usize].left = idx;
        self.pull(idx);
        self.pull(r);
        r
    }

    fn rebalance(&mut self, idx: u32) -> u32 {
        self.pull(idx);
        let (left, right) = {
            let n = &self.nodes[idx as usize];
            (n.left, n.right)
        };
        let balance = i64::from(self.height(left)) - i64::from(self.height(right));
        if balance > 1 {
            if self.height(self.nodes[left as usize].left)
                < self.height(self.nodes[left as usize].right)
            {
                let new_left = self.rotate_left(left);
                self.nodes[idx as usize].left = new_left;
            }
            self.rotate_right(idx)
        } else if balance < -1 {
            if self.height(self.nodes[right as usize].right)
                < self.height(self.nodes[right as usize].left)
            {
                let new_right = self.rotate_right(right);
                self.nodes[idx as usize].right = new_right;
            }
            self.rotate_left(idx)
        } else {
            idx
        }
    }

    fn insert_at(&mut self, at: u32, new: u32) -> u32 {
        if at == NIL {
            return new;
        }
        if self.entry_lt(new, at) {
            let child = self.nodes[at as usize].left;
            let child = self.insert_at(child, new);
            self.nodes[at as usize].left = child;
        } else {
            let child = self.nodes[at as usize].right;
            let child = self.insert_at(child, new);
            self.nodes[at as usize].right = child;
        }
        self.rebalance(at)
    }

    fn remove_at(&mut self, at: u32, key: f64, seq: u64) -> u32 {
        debug_assert_ne!(at, NIL);
        let (at_key, at_seq, left, right) = {
            let n = &self.nodes[at as usize];
            (n.key, n.seq, n.left, n.right)
        };
        let order = match key.total_cmp(&at_key) {
            Ordering::Equal => seq.cmp(&at_seq),
            other => other,
        };
        match order {
            Ordering::Less => {
                let child = self.remove_at(left, key, seq);
                self.nodes[at as usize].left = child;
            }
            Ordering::Greater => {
                let child = self.remove_at(right, key, seq);
                self.nodes[at as usize].right = child;
            }
            Ordering::Equal => {
                self.release(at);
                if left == NIL {
                    return right;
                }
                if right == NIL {
                    return left;
                }
                // Two children: lift the successor into this position.
                let (new_right, succ) = self.detach_min(right);
                self.nodes[succ as usize].left = left;
                self.nodes[succ as usize].right = new_right;
                return self.rebalance(succ);
            }
        }
        self.rebalance(at)
    }

    /// Detach the smallest entry of a nonempty subtree; returns the
    /// rebalanced subtree root and the detached node.
    fn detach_min(&mut self, at: u32) -> (u32, u32) {
        let left = self.nodes[at as usize].left;
        if left == NIL {
            let right = self.nodes[at as usize].right;
            return (right, at);
        }
        let (new_left, detached) = self.detach_min(left);
        self.nodes[at as usize].left = new_left;
        (self.rebalance(at), detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference model: a flat list of (key, seq, payload) entries.
    struct Naive {
        entries: Vec<(f64, u64, f64)>,
        next_seq: u64,
    }

    impl Naive {
        fn new() -> Self {
            Self {
                entries: Vec::new(),
                next_seq: 0,
            }
        }

        fn insert(&mut self, key: f64, payload: f64) {
            self.entries.push((key, self.next_seq, payload));
            self.next_seq += 1;
        }

        fn remove(&mut self, key: f64) -> bool {
            let target = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.0.total_cmp(&key) == Ordering::Equal)
                .min_by_key(|(_, e)| e.1)
                .map(|(i, _)| i);
            match target {
                Some(i) => {
                    self.entries.remove(i);
                    true
                }
                None => false,
            }
        }

        fn count_le(&self, x: f64) -> usize {
            self.entries.iter().filter(|e| e.0 <= x).count()
        }

        fn count_lt(&self, x: f64) -> usize {
            self.entries.iter().filter(|e| e.0 < x).count()
        }

        fn select(&self, i: usize) -> Option<(f64, f64)> {
            let mut sorted = self.entries.clone();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            sorted.get(i).map(|e| (e.0, e.2))
        }

        fn min_payload_le(&self, x: f64) -> Option<f64> {
            self.entries
                .iter()
                .filter(|e| e.0 <= x)
                .map(|e| e.2)
                .min_by(f64::total_cmp)
        }

        fn min_payload_lt(&self, x: f64) -> Option<f64> {
            self.entries
                .iter()
                .filter(|e| e.0 < x)
                .map(|e| e.2)
                .min_by(f64::total_cmp)
        }

        fn min_payload_in_range(&self, lo: f64, hi: f64) -> Option<f64> {
            self.entries
                .iter()
                .filter(|e| e.0 >= lo && e.0 <= hi)
                .map(|e| e.2)
                .min_by(f64::total_cmp)
        }
    }

    /// Walk the tree checking AVL balance and augmentation invariants.
    #[allow(clippy::float_cmp)]
    fn check_subtree(tree: &OsTree, idx: u32) -> (u32, u32, f64) {
        if idx == NIL {
            return (0, 0, f64::INFINITY);
        }
        let n = &tree.nodes[idx as usize];
        let (lh, lc, lm) = check_subtree(tree, n.left);
        let (rh, rc, rm) = check_subtree(tree, n.right);
        assert!(lh.abs_diff(rh) <= 1, "unbalanced at node {idx}");
        assert_eq!(n.height, 1 + lh.max(rh));
        assert_eq!(n.count, 1 + lc + rc);
        assert_eq!(n.min_payload, n.payload.min(lm).min(rm));
        if n.left != NIL {
            assert!(tree.entry_lt(n.left, idx));
        }
        if n.right != NIL {
            assert!(tree.entry_lt(idx, n.right));
        }
        (n.height, n.count, n.min_payload)
    }

    fn check_invariants(tree: &OsTree) {
        let (_, count, _) = check_subtree(tree, tree.root);
        assert_eq!(count as usize, tree.len());
    }

    #[test]
    fn test_empty_tree_queries() {
        let tree = OsTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.count_le(10.0), 0);
        assert_eq!(tree.select(0), None);
        assert_eq!(tree.min_payload_le(10.0), None);
        assert_eq!(tree.min_payload_in_range(0.0, 10.0), None);
    }

    #[test]
    fn test_insert_and_rank() {
        let mut tree = OsTree::new();
        for (k, p) in [(5.0, 50.0), (1.0, 10.0), (3.0, 30.0), (7.0, 70.0)] {
            tree.insert(k, p);
        }
        check_invariants(&tree);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.count_le(0.5), 0);
        assert_eq!(tree.count_le(3.0), 2);
        assert_eq!(tree.count_lt(3.0), 1);
        assert_eq!(tree.count_le(100.0), 4);
        assert_eq!(tree.select(0), Some((1.0, 10.0)));
        assert_eq!(tree.select(2), Some((5.0, 50.0)));
        assert_eq!(tree.select(4), None);
    }

    #[test]
    fn test_duplicate_keys_remove_earliest() {
        let mut tree = OsTree::new();
        tree.insert(1.0, 5.0);
        tree.insert(1.0, 3.0);
        tree.insert(1.0, 4.0);
        assert_eq!(tree.select(0), Some((1.0, 5.0)));
        assert!(tree.remove(1.0));
        // The first-inserted duplicate goes first; the others keep order.
        assert_eq!(tree.select(0), Some((1.0, 3.0)));
        assert_eq!(tree.select(1), Some((1.0, 4.0)));
        assert!(tree.remove(1.0));
        assert!(tree.remove(1.0));
        assert!(!tree.remove(1.0));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_payload_extremum_queries() {
        let mut tree = OsTree::new();
        for (k, p) in [(1.0, 9.0), (2.0, 4.0), (3.0, 6.0), (4.0, 1.0)] {
            tree.insert(k, p);
        }
        assert_eq!(tree.min_payload_le(2.0), Some(4.0));
        assert_eq!(tree.min_payload_lt(2.0), Some(9.0));
        assert_eq!(tree.min_payload_le(0.5), None);
        assert_eq!(tree.min_payload_in_range(2.0, 3.0), Some(4.0));
        assert_eq!(tree.min_payload_in_range(3.0, 3.0), Some(6.0));
        assert_eq!(tree.min_payload_in_range(4.5, 9.0), None);
    }

    #[test]
    fn test_negative_zero_key_matches_zero() {
        let mut tree = OsTree::new();
        tree.insert(-0.0, 2.0);
        assert_eq!(tree.count_le(0.0), 1);
        assert_eq!(tree.min_payload_le(0.0), Some(2.0));
        assert!(tree.remove(0.0));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_monotone_sequences_stay_balanced() {
        let mut tree = OsTree::new();
        for i in 0..256 {
            tree.insert(f64::from(i), f64::from(1000 - i));
        }
        check_invariants(&tree);
        // Height of a balanced 256-node tree is well under the worst case.
        assert!(tree.height(tree.root) <= 10);
        for i in 0..256 {
            assert!(tree.remove(f64::from(i)));
            check_invariants(&tree);
        }
    }

    #[test]
    fn test_randomized_against_naive_model() {
        let mut rng = fastrand::Rng::with_seed(0x5eed_0511);
        let mut tree = OsTree::new();
        let mut naive = Naive::new();
        for step in 0..4000 {
            // Small discrete key space so duplicates and removals collide often.
            let key = f64::from(rng.i32(-8..=8));
            let roll = rng.u8(0..10);
            if roll < 6 {
                let payload = f64::from(rng.i32(-100..=100));
                tree.insert(key, payload);
                naive.insert(key, payload);
            } else {
                assert_eq!(tree.remove(key), naive.remove(key), "step {step}");
            }
            let probe = f64::from(rng.i32(-9..=9));
            assert_eq!(tree.len(), naive.entries.len());
            assert_eq!(tree.count_le(probe), naive.count_le(probe), "step {step}");
            assert_eq!(tree.count_lt(probe), naive.count_lt(probe), "step {step}");
            assert_eq!(
                tree.min_payload_le(probe),
                naive.min_payload_le(probe),
                "step {step}"
            );
            assert_eq!(
                tree.min_payload_lt(probe),
                naive.min_payload_lt(probe),
                "step {step}"
            );
            let lo = f64::from(rng.i32(-9..=9));
            let hi = lo + f64::from(rng.u8(0..6));
            assert_eq!(
                tree.min_payload_in_range(lo, hi),
                naive.min_payload_in_range(lo, hi),
                "step {step}"
            );
            if !naive.entries.is_empty() {
                let i = rng.usize(0..naive.entries.len());
                assert_eq!(tree.select(i), naive.select(i), "step {step}");
            }
            if step % 64 == 0 {
                check_invariants(&tree);
            }
        }
        check_invariants(&tree);
    }
}
