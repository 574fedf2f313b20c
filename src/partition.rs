//! Round-robin (striped) index partitioning.
//!
//! Index `i` belongs to worker `i % workers`. Compared with contiguous
//! chunking, every stripe length is within one of every other one, whatever
//! the input length.

use std::iter::StepBy;
use std::num::NonZeroUsize;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripePartition {
    len: usize,
    workers: NonZeroUsize,
}

impl StripePartition {
    pub fn new(len: usize, workers: NonZeroUsize) -> Self {
        Self { len, workers }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Worker that owns global index `index`.
    pub fn owner(&self, index: usize) -> usize {
        index % self.workers.get()
    }

    /// Indices assigned to `worker`, ascending. Empty for workers past the
    /// end of the input (`worker >= len`) or outside `0..workers`.
    pub fn indices(&self, worker: usize) -> StepBy<Range<usize>> {
        let start = if worker < self.workers.get() {
            worker.min(self.len)
        } else {
            self.len
        };
        (start..self.len).step_by(self.workers.get())
    }

    pub fn stripe_len(&self, worker: usize) -> usize {
        if worker >= self.workers.get() || worker >= self.len {
            return 0;
        }
        (self.len - worker).div_ceil(self.workers.get())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, StepBy<Range<usize>>)> + '_ {
        (0..self.workers.get()).map(move |worker| (worker, self.indices(worker)))
    }

    /// Hands out exclusive borrows of `slots`, one bucket per worker, each
    /// bucket holding `(global index, slot)` pairs in ascending order.
    ///
    /// Always returns exactly `workers` buckets, some possibly empty.
    ///
    /// Runs serially on the caller before any worker starts and holds one
    /// `(usize, &mut T)` pair per element, so it is an O(n) pass with memory
    /// on the order of the result itself. Benchmarks of the evaluator include
    /// this cost.
    pub fn distribute<'a, T>(&self, slots: &'a mut [T]) -> Vec<Vec<(usize, &'a mut T)>> {
        debug_assert_eq!(slots.len(), self.len);

        let mut buckets: Vec<Vec<(usize, &'a mut T)>> = (0..self.workers.get())
            .map(|worker| Vec::with_capacity(self.stripe_len(worker)))
            .collect();

        for (index, slot) in slots.iter_mut().enumerate() {
            buckets[self.owner(index)].push((index, slot));
        }

        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_two_workers_seven_items() {
        let p = StripePartition::new(7, nz(2));
        assert_eq!(p.indices(0).collect::<Vec<_>>(), vec![0, 2, 4, 6]);
        assert_eq!(p.indices(1).collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(p.stripe_len(0), 4);
        assert_eq!(p.stripe_len(1), 3);
    }

    #[test]
    fn test_more_workers_than_items() {
        let p = StripePartition::new(3, nz(5));
        assert_eq!(p.indices(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(p.indices(2).collect::<Vec<_>>(), vec![2]);
        assert_eq!(p.indices(3).count(), 0);
        assert_eq!(p.indices(4).count(), 0);
        assert_eq!(p.stripe_len(4), 0);
        assert_eq!(p.iter().count(), 5);
    }

    #[test]
    fn test_single_worker_takes_everything() {
        let p = StripePartition::new(4, nz(1));
        assert_eq!(p.indices(0).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_worker_is_empty() {
        let p = StripePartition::new(10, nz(3));
        assert_eq!(p.indices(3).count(), 0);
        assert_eq!(p.stripe_len(7), 0);
    }

    #[test]
    fn test_coverage_exactly_once() {
        for len in 0..40 {
            for workers in 1..9 {
                let p = StripePartition::new(len, nz(workers));
                let mut seen = vec![0u32; len];
                for (worker, stripe) in p.iter() {
                    let stripe: Vec<usize> = stripe.collect();
                    assert_eq!(stripe.len(), p.stripe_len(worker));
                    assert!(stripe.windows(2).all(|w| w[0] < w[1]));
                    for i in stripe {
                        assert_eq!(p.owner(i), worker);
                        seen[i] += 1;
                    }
                }
                assert!(seen.iter().all(|&c| c == 1), "len={len} workers={workers}");
            }
        }
    }

    #[test]
    fn test_stripes_balanced_within_one() {
        for len in 0..50 {
            for workers in 1..9 {
                let p = StripePartition::new(len, nz(workers));
                let lens: Vec<usize> = (0..workers).map(|w| p.stripe_len(w)).collect();
                let max = *lens.iter().max().unwrap();
                let min = *lens.iter().min().unwrap();
                assert!(max - min <= 1);
                assert_eq!(lens.iter().sum::<usize>(), len);
            }
        }
    }

    #[test]
    fn test_distribute_hands_out_disjoint_slots() {
        let p = StripePartition::new(5, nz(2));
        let mut slots = vec![0; 5];
        let buckets = p.distribute(&mut slots);
        assert_eq!(buckets.len(), 2);

        for (worker, bucket) in buckets.into_iter().enumerate() {
            let indices: Vec<usize> = bucket.iter().map(|(i, _)| *i).collect();
            assert_eq!(indices, p.indices(worker).collect::<Vec<_>>());
            for (i, slot) in bucket {
                *slot = i * 10 + worker;
            }
        }
        assert_eq!(slots, vec![0, 11, 20, 31, 40]);
    }

    #[test]
    fn test_distribute_sizes_buckets_up_front() {
        let p = StripePartition::new(1_001, nz(4));
        let mut slots = vec![0u8; 1_001];
        let buckets = p.distribute(&mut slots);
        for (worker, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.len(), p.stripe_len(worker));
            assert_eq!(bucket.capacity(), p.stripe_len(worker));
        }
    }

    #[test]
    fn test_distribute_empty() {
        let p = StripePartition::new(0, nz(4));
        let mut slots: Vec<i32> = Vec::new();
        let buckets = p.distribute(&mut slots);
        assert_eq!(buckets.len(), 4);
        assert!(buckets.iter().all(Vec::is_empty));
        assert!(p.is_empty());
    }
}
