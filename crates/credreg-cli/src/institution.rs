//! # Institution Subcommand
//!
//! - `register` — register an institution owned by the caller.
//! - `verify` — verify an institution (contract owner only).
//! - `show` — print an institution record.

use anyhow::Result;
use clap::{Args, Subcommand};

use credreg_core::InstitutionId;

use crate::session::{CallArgs, Session};

/// Arguments for the `credreg institution` subcommand.
#[derive(Args, Debug)]
pub struct InstitutionArgs {
    #[command(subcommand)]
    pub command: InstitutionCommand,
}

/// Institution subcommands.
#[derive(Subcommand, Debug)]
pub enum InstitutionCommand {
    /// Register a new institution; the caller becomes its owner.
    Register {
        /// Institution identifier (e.g. "inst-456").
        #[arg(long)]
        id: InstitutionId,
        /// Display name.
        #[arg(long)]
        name: String,
        #[command(flatten)]
        call: CallArgs,
    },

    /// Verify a registered institution.
    Verify {
        /// Institution identifier.
        #[arg(long)]
        id: InstitutionId,
        #[command(flatten)]
        call: CallArgs,
    },

    /// Show an institution record.
    Show {
        /// Institution identifier.
        #[arg(long)]
        id: InstitutionId,
    },
}

/// Execute an institution subcommand.
pub fn run_institution(args: &InstitutionArgs, session: &Session) -> Result<u8> {
    match &args.command {
        InstitutionCommand::Register { id, name, call } => session.mutate(
            call,
            &format!("registered institution {id}"),
            |ledger, ctx| ledger.register_institution(ctx, id, name),
        ),
        InstitutionCommand::Verify { id, call } => session.mutate(
            call,
            &format!("verified institution {id}"),
            |ledger, ctx| ledger.verify_institution(ctx, id),
        ),
        InstitutionCommand::Show { id } => {
            let ledger = session.open()?;
            session.show("institution", ledger.get_institution_info(id))
        }
    }
}
