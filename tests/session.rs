use blockplace::repr::{
    DatanodeInfo, ErasureCodingPolicy, ExtendedBlock, FragmentIndex, Location, StorageType,
};
use blockplace::{Error, LocatedBlock, PlacementIndex, SharedPlacementIndex};
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;
use std::thread;

const CELL: u64 = 1024 * 1024;
const GROUP: u64 = 6 * CELL;

fn logger() -> slog::Logger {
    let mut builder = TerminalLoggerBuilder::new();
    builder.level(Severity::Debug);
    builder.destination(Destination::Stderr);
    builder.build().unwrap()
}

fn location(n: usize) -> Location {
    Location::new(
        DatanodeInfo::new(format!("dn-{}", n), format!("10.0.1.{}", n), 9866),
        format!("DS-{}", n),
        StorageType::Disk,
    )
}

/// A 6+3 block group with the given internal blocks missing
fn group(n: u64, missing: &[usize], generation_stamp: u64) -> LocatedBlock {
    let indices = (0..9)
        .map(|i| {
            if missing.contains(&i) {
                FragmentIndex::UNAVAILABLE
            } else {
                FragmentIndex(i as u8)
            }
        })
        .collect();
    LocatedBlock::striped(
        ExtendedBlock::new("BP-1", 1000 + n, GROUP, generation_stamp),
        n * GROUP,
        (0..9).map(location).collect(),
        indices,
    )
    .unwrap()
}

fn session(groups: u64) -> SharedPlacementIndex {
    let blocks: Vec<_> = (0..groups).map(|n| group(n, &[], 1)).collect();
    let last = blocks.last().cloned();
    PlacementIndex::builder()
        .with_logger(logger())
        .build(
            groups * GROUP,
            false,
            blocks,
            last,
            true,
            None,
            Some(ErasureCodingPolicy::new("rs", 6, 3, CELL as u32)),
        )
        .into()
}

#[test]
fn refetch_after_failed_read() {
    let shared = session(4);
    assert_eq!(shared.refresh_useful_blocks().kept_blocks, 4);

    // A read of group 2 failed; the metadata service now reports two internal blocks missing
    let stats = shared.merge_fetched(vec![group(2, &[1, 7], 2)]).unwrap();
    assert_eq!(stats.replaced, 1);
    assert_eq!(stats.inserted, 0);

    let stats = shared.refresh_useful_blocks();
    assert_eq!(stats.dropped_fragments, 2);

    let block = shared.block_at(2 * GROUP + 5).unwrap();
    assert_eq!(block.block().generation_stamp, 2);
    assert_eq!(block.locations().len(), 7);
    assert_eq!(
        block.block_indices().unwrap(),
        &(0..7).map(FragmentIndex).collect::<Vec<_>>()[..]
    );
    assert_eq!(block.locations()[1], location(2));

    let (useful, last) = shared.useful_snapshot().unwrap();
    assert_eq!(useful.len(), 4);
    assert_eq!(last.as_ref(), useful.last());
    assert!(shared.block_at(4 * GROUP).is_none());
}

#[test]
fn fetch_more_groups_at_end() {
    let shared = session(2);
    let stats = shared
        .merge_fetched(vec![group(2, &[], 1), group(3, &[0], 1)])
        .unwrap();
    assert_eq!(stats.inserted, 2);
    assert_eq!(shared.read().count(), 4);
    assert_eq!(shared.find(3 * GROUP).position(), Some(3));
}

#[test]
fn rejected_merge_leaves_index() {
    let shared = session(3);
    let err = shared
        .insert_range(0, vec![group(1, &[], 2)])
        .unwrap_err();
    assert_eq!(
        err,
        Error::OrderingContradiction {
            new_offset: GROUP,
            old_offset: 0
        }
    );
    assert!(shared
        .read()
        .iter()
        .all(|b| b.block().generation_stamp == 1));
}

#[test]
fn readers_see_consistent_useful_view() {
    let shared = session(8);
    shared.refresh_useful_blocks();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let (useful, last) = shared.useful_snapshot().unwrap();
                    // Every view is installed whole, so one snapshot never mixes generations
                    assert_eq!(useful.len(), 8);
                    let stamp = useful[0].block().generation_stamp;
                    assert!(useful.iter().all(|b| b.block().generation_stamp == stamp));
                    assert_eq!(last.map(|b| b.block().generation_stamp), Some(stamp));
                }
            })
        })
        .collect();

    for generation_stamp in 2..40 {
        let view = (0..8).map(|n| group(n, &[], generation_stamp)).collect();
        shared.set_useful_blocks(view).unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
    let (useful, _) = shared.useful_snapshot().unwrap();
    assert!(useful.iter().all(|b| b.block().generation_stamp == 39));
}
