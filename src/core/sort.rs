//! Comparator-driven ordering of blocks.

use crate::core::block::Block;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::sync::Arc;

/// A shared, ordered collection of blocks.
pub type Blocks = Vec<Arc<Block>>;

/// Sorts blocks with a "less than" predicate.
///
/// Works on anything that borrows as a [`Block`], so `&mut [Block]` and
/// [`Blocks`] sort alike. The sort is stable.
pub struct BlockBy<F>(pub F);

impl<F> BlockBy<F>
where
    F: Fn(&Block, &Block) -> bool,
{
    pub fn sort<B: Borrow<Block>>(&self, blocks: &mut [B]) {
        blocks.sort_by(|a, b| {
            let (a, b) = (a.borrow(), b.borrow());
            if (self.0)(a, b) {
                Ordering::Less
            } else if (self.0)(b, a) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });
    }
}

/// Orders blocks by ascending number.
pub fn number(b1: &Block, b2: &Block) -> bool {
    b1.header_ref().number < b2.header_ref().number
}

/// Sorts blocks by ascending number.
pub const BY_NUMBER: BlockBy<fn(&Block, &Block) -> bool> = BlockBy(number);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::utils::sample_header;
    use num_bigint::BigUint;

    fn block(number: u64) -> Block {
        Block::with_header(&sample_header(1, number))
    }

    fn numbers<B: Borrow<Block>>(blocks: &[B]) -> Vec<u64> {
        blocks.iter().map(|b| b.borrow().number_u64()).collect()
    }

    #[test]
    fn sorts_by_number() {
        let mut blocks: Blocks = [5, 1, 4, 2, 3].into_iter().map(|n| Arc::new(block(n))).collect();
        BlockBy(number).sort(&mut blocks);
        assert_eq!(numbers(&blocks), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn resorting_is_idempotent() {
        let mut blocks: Vec<Block> = [3, 1, 2].into_iter().map(block).collect();
        BY_NUMBER.sort(&mut blocks);
        let first = blocks.iter().map(Block::hash).collect::<Vec<_>>();
        BY_NUMBER.sort(&mut blocks);
        assert_eq!(blocks.iter().map(Block::hash).collect::<Vec<_>>(), first);
    }

    #[test]
    fn compares_numbers_beyond_64_bits() {
        let mut big = sample_header(1, 0);
        big.number = BigUint::from(1u8) << 80u32;
        let mut blocks = vec![Block::with_header(&big), block(u64::MAX)];
        BY_NUMBER.sort(&mut blocks);
        assert_eq!(blocks[0].number_u64(), u64::MAX);
        assert_eq!(blocks[1].number(), BigUint::from(1u8) << 80u32);
    }

    #[test]
    fn custom_comparator() {
        let mut blocks: Vec<Block> = [1, 2, 3].into_iter().map(block).collect();
        BlockBy(|a: &Block, b: &Block| number(b, a)).sort(&mut blocks);
        assert_eq!(numbers(&blocks), vec![3, 2, 1]);
    }

    #[test]
    fn empty_and_single() {
        let mut empty: Vec<Block> = Vec::new();
        BY_NUMBER.sort(&mut empty);
        let mut single = vec![block(7)];
        BY_NUMBER.sort(&mut single);
        assert_eq!(numbers(&single), vec![7]);
    }
}
