use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::analysis::ConversationAnalysis;
use crate::config::AnalysisConfig;
use crate::error::{Result, SmittenError};
use crate::models::{BatchReport, RankedConversation, Slot};

/// Only the first page of a paginated conversation is read.
const MESSAGE_FILE_NAME: &str = "message_1.json";

const MOST_ACTIVE_LIMIT: usize = 10;

/// Analysis over a whole export directory: every subdirectory of
/// `root/inbox/` holding a `message_1.json` is one conversation.
#[derive(Debug, Clone)]
pub struct InboxAnalysis {
    config: AnalysisConfig,
    message_files: Vec<PathBuf>,
}

impl InboxAnalysis {
    pub fn open(root: &Path, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let inbox = root.join("inbox");
        if !inbox.is_dir() {
            return Err(SmittenError::MissingInputFile(inbox));
        }

        let mut message_files = Vec::new();
        for entry in WalkDir::new(&inbox).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable inbox entry: {err}");
                    continue;
                }
            };
            if entry.file_type().is_file() && entry.file_name().to_str() == Some(MESSAGE_FILE_NAME)
            {
                message_files.push(entry.into_path());
            }
        }
        debug!("discovered {} conversation files", message_files.len());

        Ok(Self {
            config,
            message_files,
        })
    }

    /// Discovered conversation files, in walk order.
    #[must_use]
    pub fn message_files(&self) -> &[PathBuf] {
        &self.message_files
    }

    /// The participant name that recurs across more than two valid
    /// conversations: the common node of the one-to-one conversation star,
    /// i.e. the export's owner. `None` when no name recurs enough.
    #[must_use]
    pub fn current_user(&self) -> Option<String> {
        infer_current_user(&self.load_all())
    }

    /// Ranked batch report. Conversations below the configured minimum
    /// message count are left out; per-file failures are logged and skipped,
    /// never aborting the batch.
    #[must_use]
    pub fn report(&self) -> BatchReport {
        let loaded = self.load_all();
        let current_user = infer_current_user(&loaded);

        let mut conversations = Vec::new();
        for (path, analysis) in &loaded {
            if analysis.message_count() < self.config.min_messages {
                debug!(
                    "skipping {} below minimum message count ({} < {})",
                    path.display(),
                    analysis.message_count(),
                    self.config.min_messages
                );
                continue;
            }
            let current_user_share = current_user
                .as_deref()
                .and_then(|user| analysis.pair().slot_of(user))
                .map(|slot| analysis.gradient_share(slot));
            conversations.push(RankedConversation {
                path: path.display().to_string(),
                participants: analysis.pair().names(),
                message_count: analysis.message_count(),
                segment_count: analysis.segments().len(),
                current_user_share,
                verdict: analysis.verdict(),
            });
        }

        // Descending by the current user's share. The sort is stable, so
        // share-less entries keep discovery order.
        conversations.sort_by(|a, b| {
            b.current_user_share
                .unwrap_or(0.0)
                .total_cmp(&a.current_user_share.unwrap_or(0.0))
        });

        let mut most_active = conversations.clone();
        most_active.sort_by(|a, b| b.segment_count.cmp(&a.segment_count));
        most_active.truncate(MOST_ACTIVE_LIMIT);

        BatchReport {
            strategy: self.config.strategy,
            current_user,
            conversations,
            most_active,
        }
    }

    fn load_all(&self) -> Vec<(PathBuf, ConversationAnalysis)> {
        let mut loaded = Vec::new();
        for path in &self.message_files {
            match ConversationAnalysis::load(path, self.config) {
                Ok(analysis) => loaded.push((path.clone(), analysis)),
                Err(err) => warn!("skipping {} [{}]: {err}", path.display(), err.code()),
            }
        }
        loaded
    }
}

fn infer_current_user(loaded: &[(PathBuf, ConversationAnalysis)]) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for (_, analysis) in loaded {
        for slot in Slot::BOTH {
            let name = analysis.pair().name(slot);
            match counts.iter_mut().find(|(seen, _)| seen == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name.to_string(), 1)),
            }
        }
    }
    counts
        .into_iter()
        .find(|(_, count)| *count > 2)
        .map(|(name, _)| name)
}
