use std::collections::HashSet;
use std::io::{self, Write};

use super::args::OutputFormat;
use crate::{
    domain::{
        models::{
            RetentionDecision, RetentionPlan, RetentionPolicy, RetentionTier, SnapshotRecord,
        },
        value_objects::{Region, VolumeId},
    },
    ports::services::{CleanupReport, SnapshotCreation},
};

/// Writes run results for a human or a machine reader.
///
/// Quiet suppresses everything. Settings and per-snapshot lines are only
/// written in verbose mode; summaries and failures always are.
#[derive(Debug, Clone, Copy)]
pub struct ReportPrinter {
    quiet: bool,
    verbose: bool,
    format: OutputFormat,
}

impl ReportPrinter {
    pub fn new(quiet: bool, verbose: bool, format: OutputFormat) -> Self {
        Self {
            quiet,
            verbose,
            format,
        }
    }

    fn shows_details(&self) -> bool {
        !self.quiet && self.verbose && self.format == OutputFormat::Text
    }

    fn shows_summary(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }

    pub fn print_settings<W: Write>(
        &self,
        out: &mut W,
        volume: &VolumeId,
        region: &Region,
        policy: &RetentionPolicy,
    ) -> io::Result<()> {
        if !self.shows_details() {
            return Ok(());
        }

        let yes_no = |flag: bool| if flag { "Y" } else { "N" };
        writeln!(out, "SETTINGS")?;
        writeln!(out, "========")?;
        writeln!(out, "Volume: .......... {}", volume)?;
        writeln!(out, "Region: .......... {}", region.display_name())?;
        writeln!(out, "Quiet: ........... {}", yes_no(self.quiet))?;
        writeln!(out, "No Operation: .... {}", yes_no(policy.dry_run))?;
        writeln!(out, "Verbose: ......... {}", yes_no(self.verbose))?;
        writeln!(out)
    }

    pub fn print_creation<W: Write>(
        &self,
        out: &mut W,
        creation: &SnapshotCreation,
    ) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut *out, creation)?;
            return writeln!(out);
        }

        match creation {
            SnapshotCreation::Created { snapshot } => writeln!(
                out,
                "Snapshot [{}] initiated for volume {}",
                snapshot.id, snapshot.volume_id
            ),
            SnapshotCreation::DryRun { volume } => {
                writeln!(out, "No operation taken, snapshot of {} not initiated", volume)
            }
        }
    }

    pub fn print_plan<W: Write>(&self, out: &mut W, plan: &RetentionPlan) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut *out, plan)?;
            return writeln!(out);
        }

        // A plan is what the user asked for, so decisions are printed without --verbose
        for decision in &plan.decisions {
            write_snapshot_line(out, &decision.snapshot, decision.tier.reason(), Some(decision))?;
        }
        for rejected in &plan.rejected {
            write_snapshot_line(out, &rejected.snapshot, &rejected.error().to_string(), None)?;
        }

        writeln!(
            out,
            "{} snapshot(s) kept, {} would be deleted",
            plan.kept_count(),
            plan.to_delete().len()
        )
    }

    pub fn print_cleanup<W: Write>(&self, out: &mut W, report: &CleanupReport) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut *out, report)?;
            return writeln!(out);
        }

        if report.decisions.is_empty() && report.rejected.is_empty() {
            return writeln!(out, "No snapshots found for volume: {}", report.volume);
        }

        if self.shows_details() {
            writeln!(out, "CLEANUP")?;
            writeln!(out, "=======")?;
            for decision in &report.decisions {
                write_snapshot_line(out, &decision.snapshot, decision.tier.reason(), Some(decision))?;
            }
        }

        for rejected in &report.rejected {
            write_snapshot_line(out, &rejected.snapshot, &rejected.error().to_string(), None)?;
        }

        if report.decisions.len() + report.rejected.len() <= 1 {
            return writeln!(out, "Not enough snapshots found to manage");
        }

        if self.shows_details() && !report.dry_run {
            let failed: HashSet<_> = report.deleted_failed.iter().map(|f| &f.snapshot_id).collect();
            let skipped: HashSet<_> = report.skipped.iter().collect();

            for decision in report.decisions.iter().filter(|d| {
                d.tier == RetentionTier::Delete
                    && !failed.contains(&d.snapshot.id)
                    && !skipped.contains(&d.snapshot.id)
            }) {
                write_snapshot_line(out, &decision.snapshot, "Snapshot deleted", None)?;
            }
        }

        for failure in &report.deleted_failed {
            writeln!(
                out,
                "[{}] - Failed to delete snapshot: {}",
                failure.snapshot_id, failure.error
            )?;
        }

        if !report.skipped.is_empty() {
            writeln!(
                out,
                "Cancelled before deleting {} snapshot(s)",
                report.skipped.len()
            )?;
        }

        if !self.shows_summary() {
            return Ok(());
        }

        writeln!(out)?;
        if report.dry_run {
            writeln!(
                out,
                "Snapshot management complete - No operation taken, but would have deleted {} snapshot(s)",
                report.deleted_requested
            )
        } else {
            writeln!(
                out,
                "Snapshot management complete - {} snapshot(s) deleted",
                report.deleted_succeeded
            )
        }
    }
}

fn write_snapshot_line<W: Write>(
    out: &mut W,
    snapshot: &SnapshotRecord,
    message: &str,
    decision: Option<&RetentionDecision>,
) -> io::Result<()> {
    let description = snapshot
        .description
        .as_deref()
        .map(|d| format!(" {} ", d))
        .unwrap_or_else(|| " ".to_string());

    match decision {
        Some(decision) => writeln!(
            out,
            "[{}]{}- {} from {}",
            snapshot.id,
            description,
            message,
            decision.created_at.format("%a %d %b %Y")
        ),
        None => writeln!(out, "[{}]{}- {}", snapshot.id, description, message),
    }
}
