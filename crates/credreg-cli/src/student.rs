//! # Student Subcommand
//!
//! Register, verify (student authority only), and show student records.

use anyhow::Result;
use clap::{Args, Subcommand};

use credreg_core::StudentId;

use crate::session::{CallArgs, Session};

/// Arguments for the `credreg student` subcommand.
#[derive(Args, Debug)]
pub struct StudentArgs {
    #[command(subcommand)]
    pub command: StudentCommand,
}

/// Student subcommands.
#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    /// Register a new student; the caller becomes its owner.
    Register {
        /// Student identifier.
        #[arg(long)]
        id: StudentId,
        #[command(flatten)]
        call: CallArgs,
    },

    /// Verify a registered student at the call height.
    Verify {
        /// Student identifier.
        #[arg(long)]
        id: StudentId,
        #[command(flatten)]
        call: CallArgs,
    },

    /// Show a student record.
    Show {
        /// Student identifier.
        #[arg(long)]
        id: StudentId,
    },
}

/// Execute a student subcommand.
pub fn run_student(args: &StudentArgs, session: &Session) -> Result<u8> {
    match &args.command {
        StudentCommand::Register { id, call } => session.mutate(
            call,
            &format!("registered student {id}"),
            |ledger, ctx| ledger.register_student(ctx, id),
        ),
        StudentCommand::Verify { id, call } => session.mutate(
            call,
            &format!("verified student {id}"),
            |ledger, ctx| ledger.verify_student(ctx, id),
        ),
        StudentCommand::Show { id } => {
            let ledger = session.open()?;
            session.show("student", ledger.get_student_info(id))
        }
    }
}
