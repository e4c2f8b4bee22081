//! Hypergraph database operations

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::error::CliResult;

/// Hypergraph database operations
#[derive(Args, Debug)]
pub struct HgCommand {
    /// Database operation
    #[arg(long, default_value = "info")]
    pub op: String,
    
    /// Generation ID to operate on
    #[arg(long)]
    pub gen: Option<u64>,
    
    /// Export format
    #[arg(long)]
    pub format: Option<String>,
    
    /// Output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    
    /// Compact database
    #[arg(long)]
    pub compact: bool,
}

impl HgCommand {
    pub async fn execute(
        self,
        _workspace: PathBuf,
        _config: Option<PathBuf>,
    ) -> CliResult<()> {
        info!("Hypergraph database operations coming in Phase 4+");
        info!("Operation: {}", self.op);
        
        if let Some(gen) = self.gen {
            info!("Generation: {}", gen);
        }
        
        if self.compact {
            info!("Would compact database");
        }
        
        Ok(())
    }
}