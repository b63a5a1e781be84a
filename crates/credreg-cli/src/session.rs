//! # Session
//!
//! Resolves the deployment config, loads the ledger from its state file,
//! applies a single call, and writes the state back only when the call
//! committed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use credreg_core::{CallContext, DeploymentConfig, Height, LedgerError, Principal};
use credreg_state::{Ledger, LedgerSnapshot, StoreName};

/// Default state file, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = ".credreg/state.json";

/// Exit code for a call the registry rejected.
pub const EXIT_REJECTED: u8 = 2;

/// Caller identity and height for a mutating call.
#[derive(Args, Debug, Clone)]
pub struct CallArgs {
    /// Principal submitting the call.
    #[arg(long)]
    pub caller: Principal,

    /// Block height of the call. Defaults to one past the last committed height.
    #[arg(long)]
    pub height: Option<u64>,
}

impl CallArgs {
    /// Build the call context, defaulting the height from the ledger watermark.
    pub fn context(&self, ledger: &Ledger) -> CallContext {
        let height = match self.height {
            Some(h) => Height(h),
            None => ledger.last_height().map_or(Height(1), |h| h.next()),
        };
        CallContext::new(self.caller.clone(), height)
    }
}

/// Where the ledger lives and which deployment config the caller asked for.
///
/// The deployment config is fixed when the state file is created and stored
/// in it. Later invocations may omit it; if they pass one, it must match.
#[derive(Debug, Clone)]
pub struct Session {
    state_file: PathBuf,
    requested: Option<DeploymentConfig>,
}

impl Session {
    /// Resolve the requested deployment config from an optional YAML file
    /// plus optional principal overrides.
    ///
    /// Without a file, `contract_owner` alone yields a config in which
    /// `student_authority` defaults to it. With no file and no principals,
    /// the config stored in the state file is used.
    pub fn resolve(
        state_file: PathBuf,
        config_file: Option<&Path>,
        contract_owner: Option<Principal>,
        student_authority: Option<Principal>,
    ) -> Result<Self> {
        let requested = match (config_file, contract_owner) {
            (Some(path), owner) => {
                let mut config = DeploymentConfig::load(path)
                    .with_context(|| format!("loading deployment config {}", path.display()))?;
                if let Some(owner) = owner {
                    config.contract_owner = owner;
                }
                Some(config)
            }
            (None, Some(owner)) => Some(DeploymentConfig::single_authority(owner)),
            (None, None) => None,
        };
        let requested = match (requested, student_authority) {
            (Some(mut config), Some(authority)) => {
                config.student_authority = authority;
                Some(config)
            }
            (None, Some(_)) => {
                bail!("--student-authority requires --config <file> or --contract-owner <principal>")
            }
            (config, None) => config,
        };
        if let Some(config) = &requested {
            tracing::debug!(
                contract_owner = %config.contract_owner,
                student_authority = %config.student_authority,
                "deployment config requested"
            );
        }
        Ok(Self {
            state_file,
            requested,
        })
    }

    /// The state file path.
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// The deployment config given on the command line, if any.
    pub fn requested(&self) -> Option<&DeploymentConfig> {
        self.requested.as_ref()
    }

    /// Load the ledger under the config recorded in the state file.
    ///
    /// A missing state file is an empty ledger under the requested config;
    /// it is an error when none was requested. An existing state file
    /// refuses a requested config that differs from the recorded one.
    pub fn open(&self) -> Result<Ledger> {
        if !self.state_file.exists() {
            let Some(config) = &self.requested else {
                bail!(
                    "{} does not exist: pass --config <file> or --contract-owner <principal> to create it",
                    self.state_file.display()
                );
            };
            tracing::info!(path = %self.state_file.display(), "state file absent; starting empty");
            return Ok(Ledger::new(config.clone()));
        }
        let raw = std::fs::read_to_string(&self.state_file)
            .with_context(|| format!("reading {}", self.state_file.display()))?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.state_file.display()))?;
        if let Some(requested) = &self.requested {
            if requested != &snapshot.config {
                bail!(
                    "{} was deployed with contract owner {} and student authority {}; \
                     refusing a different deployment config",
                    self.state_file.display(),
                    snapshot.config.contract_owner,
                    snapshot.config.student_authority
                );
            }
        }
        Ok(Ledger::from_snapshot(snapshot))
    }

    /// Write the ledger back, replacing the state file atomically.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(dir) = self.state_file.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&ledger.snapshot())?;
        let tmp = self.state_file.with_extension("json.tmp");
        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.state_file)
            .with_context(|| format!("replacing {}", self.state_file.display()))?;
        Ok(())
    }

    /// Apply one mutating call. Persists and prints `OK` on commit; prints
    /// the rejection and returns [`EXIT_REJECTED`] otherwise.
    pub fn mutate<F>(&self, call: &CallArgs, describe: &str, f: F) -> Result<u8>
    where
        F: FnOnce(&mut Ledger, &CallContext) -> Result<(), LedgerError>,
    {
        let mut ledger = self.open()?;
        let ctx = call.context(&ledger);
        match f(&mut ledger, &ctx) {
            Ok(()) => {
                self.save(&ledger)?;
                println!("OK: {describe} (caller {}, height {})", ctx.caller, ctx.height);
                Ok(0)
            }
            Err(err) => {
                println!("ERR {} (u{}): {err}", err.kind(), err.code());
                Ok(EXIT_REJECTED)
            }
        }
    }

    /// Print a record as pretty JSON, or report its absence with exit code 1.
    pub fn show<T: serde::Serialize>(&self, what: &str, record: Option<T>) -> Result<u8> {
        match record {
            Some(record) => {
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(0)
            }
            None => {
                println!("No {what} found.");
                Ok(1)
            }
        }
    }

    /// Print a summary of the state file.
    pub fn status(&self) -> Result<u8> {
        let ledger = self.open()?;
        let store = ledger.store();
        let config = ledger.config();
        println!("State file: {}", self.state_file.display());
        println!("  Contract owner: {}", config.contract_owner);
        println!("  Student authority: {}", config.student_authority);
        match ledger.last_height() {
            Some(h) => println!("  Last height: {h}"),
            None => println!("  Last height: (none)"),
        }
        for name in [StoreName::Institutions, StoreName::Students, StoreName::Achievements] {
            println!("  {name}: {}", store.len(name));
            for key in store.keys(name) {
                println!("    {key}");
            }
        }
        println!("  Digest: {}", store.digest()?);
        Ok(0)
    }
}
