//! # Achievement Subcommand
//!
//! - `issue` — issue an achievement from an institution the caller owns.
//! - `revoke` — revoke an achievement.
//! - `show` — print an achievement record.

use anyhow::Result;
use clap::{Args, Subcommand};

use credreg_core::{AchievementId, InstitutionId, StudentId};
use credreg_state::IssueRequest;

use crate::session::{CallArgs, Session};

/// Arguments for the `credreg achievement` subcommand.
#[derive(Args, Debug)]
pub struct AchievementArgs {
    #[command(subcommand)]
    pub command: AchievementCommand,
}

/// Achievement subcommands.
#[derive(Subcommand, Debug)]
pub enum AchievementCommand {
    /// Issue a new achievement at the call height.
    Issue {
        /// Achievement identifier.
        #[arg(long)]
        id: AchievementId,
        /// Recipient student identifier (need not be registered).
        #[arg(long)]
        student: StudentId,
        /// Issuing institution identifier.
        #[arg(long)]
        institution: InstitutionId,
        /// Achievement category (e.g. "degree").
        #[arg(long = "type")]
        achievement_type: String,
        /// Achievement title.
        #[arg(long)]
        name: String,
        /// Description.
        #[arg(long, default_value = "")]
        description: String,
        /// Optional metadata URI.
        #[arg(long)]
        metadata_uri: Option<String>,
        #[command(flatten)]
        call: CallArgs,
    },

    /// Revoke an issued achievement.
    Revoke {
        /// Achievement identifier.
        #[arg(long)]
        id: AchievementId,
        #[command(flatten)]
        call: CallArgs,
    },

    /// Show an achievement record.
    Show {
        /// Achievement identifier.
        #[arg(long)]
        id: AchievementId,
    },
}

/// Execute an achievement subcommand.
pub fn run_achievement(args: &AchievementArgs, session: &Session) -> Result<u8> {
    match &args.command {
        AchievementCommand::Issue {
            id,
            student,
            institution,
            achievement_type,
            name,
            description,
            metadata_uri,
            call,
        } => {
            let request = IssueRequest {
                achievement_id: id.clone(),
                student_id: student.clone(),
                institution_id: institution.clone(),
                achievement_type: achievement_type.clone(),
                name: name.clone(),
                description: description.clone(),
                metadata_uri: metadata_uri.clone(),
            };
            session.mutate(call, &format!("issued achievement {id}"), |ledger, ctx| {
                ledger.issue_achievement(ctx, &request)
            })
        }
        AchievementCommand::Revoke { id, call } => session.mutate(
            call,
            &format!("revoked achievement {id}"),
            |ledger, ctx| ledger.revoke_achievement(ctx, id),
        ),
        AchievementCommand::Show { id } => {
            let ledger = session.open()?;
            session.show("achievement", ledger.get_achievement(id))
        }
    }
}
