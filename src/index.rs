use crate::block::LocatedBlock;
use crate::config::{Config, Validation};
use crate::errors::*;
use crate::merge::{self, MergeStats};
use crate::search::{self, SearchResult};
use crate::useful::{self, FilterStats, UsefulBlocks};
use repr::{ErasureCodingPolicy, FileEncryptionInfo};
use slog::Logger;
use std::fmt;
use std::ops::Index;

/// The blocks of one file, sorted by start offset, as last reported by the metadata service
///
/// A `PlacementIndex` is built once per read session. Fresher block locations are merged in with
/// [`insert_range`](Self::insert_range), and [`refresh_useful_blocks`](Self::refresh_useful_blocks)
/// derives the view readers of an erasure coded file should use.
///
/// There is no internal locking: wrap it in a
/// [`SharedPlacementIndex`](crate::SharedPlacementIndex) to share it between threads.
pub struct PlacementIndex {
    file_length: Option<u64>,
    under_construction: bool,
    blocks: Option<Vec<LocatedBlock>>,
    last_block: Option<LocatedBlock>,
    last_block_complete: bool,
    encryption_info: Option<FileEncryptionInfo>,
    ec_policy: Option<ErasureCodingPolicy>,

    useful: Option<UsefulBlocks>,

    config: Config,
    logger: Logger,
}

static_assertions::assert_impl_all!(PlacementIndex: Send, Sync);

impl PlacementIndex {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        file_length: u64,
        under_construction: bool,
        blocks: Vec<LocatedBlock>,
        last_block: Option<LocatedBlock>,
        last_block_complete: bool,
        encryption_info: Option<FileEncryptionInfo>,
        ec_policy: Option<ErasureCodingPolicy>,
    ) -> Self {
        PlacementIndexBuilder::new().build(
            file_length,
            under_construction,
            blocks,
            last_block,
            last_block_complete,
            encryption_info,
            ec_policy,
        )
    }

    pub fn builder() -> PlacementIndexBuilder {
        PlacementIndexBuilder::new()
    }

    /// The blocks, sorted by start offset
    ///
    /// Empty if no blocks have been loaded.
    pub fn entries(&self) -> &[LocatedBlock] {
        self.blocks.as_deref().unwrap_or(&[])
    }

    /// Returns false for an index created with [`Default`], which has no block list at all
    pub fn has_blocks(&self) -> bool {
        self.blocks.is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocatedBlock> {
        self.entries().iter()
    }

    pub fn get(&self, idx: usize) -> Option<&LocatedBlock> {
        self.entries().get(idx)
    }

    pub fn count(&self) -> usize {
        self.entries().len()
    }

    pub fn file_length(&self) -> Option<u64> {
        self.file_length
    }

    /// True if the file was still being written when its blocks were fetched
    pub fn is_under_construction(&self) -> bool {
        self.under_construction
    }

    pub fn last_block(&self) -> Option<&LocatedBlock> {
        self.last_block.as_ref()
    }

    pub fn is_last_block_complete(&self) -> bool {
        self.last_block_complete
    }

    pub fn encryption_info(&self) -> Option<&FileEncryptionInfo> {
        self.encryption_info.as_ref()
    }

    /// The erasure coding policy, `None` for a replicated file
    pub fn ec_policy(&self) -> Option<&ErasureCodingPolicy> {
        self.ec_policy.as_ref()
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Find the block containing `offset`
    ///
    /// Searches the useful view while one is installed, the full block list otherwise. A miss is
    /// not an error: the result encodes where a block starting at `offset` would go.
    pub fn find(&self, offset: u64) -> SearchResult {
        match &self.useful {
            Some(useful) => search::find_block(useful, offset),
            None => self.find_in_base(offset),
        }
    }

    /// Find the block containing `offset` in the full block list, ignoring any useful view
    pub fn find_in_base(&self, offset: u64) -> SearchResult {
        search::find_block(self.entries(), offset)
    }

    /// Merge freshly fetched blocks into the block list
    ///
    /// `new_blocks` must be sorted by start offset. Walking from `hint`, each new block either
    /// replaces the existing block with the same start offset or is inserted in front of the first
    /// existing block that starts after it. The useful view is not touched.
    ///
    /// If the blocks cannot be merged without breaking the sort order, the list is left unchanged
    /// and the violation is reported according to [`Config::validation`].
    pub fn insert_range(&mut self, hint: usize, new_blocks: Vec<LocatedBlock>) -> Result<MergeStats> {
        let new_count = new_blocks.len();
        let res = match &mut self.blocks {
            Some(blocks) => merge::merge_range(blocks, hint, new_blocks),
            None => Err(Error::NoBlocks),
        };
        let stats = self.check(res)?;
        slog::debug!(self.logger, "Merged located blocks";
            "hint" => hint,
            "new" => new_count,
            "inserted" => stats.inserted,
            "replaced" => stats.replaced,
            "count" => self.count()
        );
        Ok(stats)
    }

    /// Rebuild the useful view from the current block list
    ///
    /// Striped blocks lose their unavailable locations and have the rest renumbered from zero.
    /// Contiguous blocks are not part of the view at all.
    pub fn refresh_useful_blocks(&mut self) -> FilterStats {
        let (view, stats) = useful::useful_blocks(self.entries());
        self.useful = Some(view);
        slog::debug!(self.logger, "Refreshed useful blocks";
            "kept" => stats.kept_blocks,
            "dropped_plain" => stats.dropped_plain,
            "dropped_fragments" => stats.dropped_fragments
        );
        stats
    }

    /// Install `blocks` as the useful view, as-is
    ///
    /// `blocks` must not be empty.
    pub fn set_useful_blocks(&mut self, blocks: Vec<LocatedBlock>) -> Result<()> {
        let view = self.check(UsefulBlocks::from_vec(blocks))?;
        slog::debug!(self.logger, "Installed useful blocks"; "count" => view.len());
        self.useful = Some(view);
        Ok(())
    }

    /// Drop the useful view, returning it
    ///
    /// Lookups go back to the full block list.
    pub fn clear_useful_blocks(&mut self) -> Option<UsefulBlocks> {
        self.useful.take()
    }

    pub fn useful_blocks(&self) -> Option<&[LocatedBlock]> {
        self.useful.as_deref()
    }

    pub fn useful_block(&self, idx: usize) -> Option<&LocatedBlock> {
        self.useful.as_ref().and_then(|useful| useful.get(idx))
    }

    pub fn last_useful_block(&self) -> Option<&LocatedBlock> {
        self.useful.as_ref().and_then(UsefulBlocks::last)
    }

    /// A dump of every field, for logging
    pub fn describe(&self) -> String {
        self.to_string()
    }

    fn check<T>(&self, res: Result<T>) -> Result<T> {
        if let Err(e) = &res {
            slog::error!(self.logger, "Rejected located blocks"; "error" => %e);
            if self.config.validation == Validation::Panic {
                panic!("{}", e);
            }
        }
        res
    }
}

/// An index with no block list, no file length and no useful view
impl Default for PlacementIndex {
    fn default() -> Self {
        Self {
            file_length: None,
            under_construction: false,
            blocks: None,
            last_block: None,
            last_block_complete: false,
            encryption_info: None,
            ec_policy: None,
            useful: None,
            config: Config::default(),
            logger: crate::default_logger(),
        }
    }
}

impl Index<usize> for PlacementIndex {
    type Output = LocatedBlock;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.entries()[idx]
    }
}

impl<'a> IntoIterator for &'a PlacementIndex {
    type Item = &'a LocatedBlock;
    type IntoIter = std::slice::Iter<'a, LocatedBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct DisplayList<'a>(&'a [LocatedBlock]);

impl fmt::Display for DisplayList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, block) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", block)?;
        }
        f.write_str("]")
    }
}

struct DisplayOpt<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for DisplayOpt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => fmt::Display::fmt(v, f),
            None => f.write_str("null"),
        }
    }
}

impl fmt::Display for PlacementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PlacementIndex{{;  fileLength={};  underConstruction={};  blocks={};  lastLocatedBlock={};  isLastBlockComplete={};  ecPolicy={}}}",
            DisplayOpt(self.file_length),
            self.under_construction,
            DisplayList(self.entries()),
            DisplayOpt(self.last_block.as_ref()),
            self.last_block_complete,
            DisplayOpt(self.ec_policy.as_ref()),
        )
    }
}

impl fmt::Debug for PlacementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementIndex")
            .field("file_length", &self.file_length)
            .field("under_construction", &self.under_construction)
            .field("blocks", &self.blocks)
            .field("last_block", &self.last_block)
            .field("last_block_complete", &self.last_block_complete)
            .field("encryption_info", &self.encryption_info)
            .field("ec_policy", &self.ec_policy)
            .field("useful", &self.useful)
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct PlacementIndexBuilder {
    config: Config,
    logger: Option<Logger>,
}

impl PlacementIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn validation(&mut self, validation: Validation) -> &mut Self {
        self.config.validation = validation;
        self
    }

    pub fn with_logger(&mut self, logger: Logger) -> &mut Self {
        self.logger = Some(logger);
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn build(
        &mut self,
        file_length: u64,
        under_construction: bool,
        blocks: Vec<LocatedBlock>,
        last_block: Option<LocatedBlock>,
        last_block_complete: bool,
        encryption_info: Option<FileEncryptionInfo>,
        ec_policy: Option<ErasureCodingPolicy>,
    ) -> PlacementIndex {
        let logger = self.logger.take().unwrap_or_else(crate::default_logger);
        let logger = logger.new(slog::o!("file_length" => file_length));
        slog::debug!(logger, "Loaded located blocks";
            "count" => blocks.len(),
            "under_construction" => under_construction,
            "last_block_complete" => last_block_complete,
            "erasure_coded" => ec_policy.is_some()
        );
        PlacementIndex {
            file_length: Some(file_length),
            under_construction,
            blocks: Some(blocks),
            last_block,
            last_block_complete,
            encryption_info,
            ec_policy,
            useful: None,
            config: self.config,
            logger,
        }
    }
}
