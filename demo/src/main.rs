//! TALENTGATE — Demo CLI
//!
//! Runs the full candidate evaluation pipeline over a bundled sample job
//! and three resumes, using the deterministic reference agents. Every
//! decision lands in the audit ledger; pass `--ledger` to persist it as
//! JSONL.
//!
//! Usage:
//!   cargo run -p demo -- run
//!   cargo run -p demo -- run --policy policies/strict.toml --ledger audit.jsonl
//!   cargo run -p demo -- agents

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use talentgate_audit::{ComplianceExport, JsonlLedger, MemoryLedger};
use talentgate_contracts::candidate::CandidateProfile;
use talentgate_contracts::error::PipelineResult;
use talentgate_contracts::job::{EducationLevel, JobProfile};
use talentgate_core::sink::AuditSink;
use talentgate_pipeline::Orchestrator;
use talentgate_policy::PipelinePolicy;

// ── CLI definition ────────────────────────────────────────────────────────────

/// TALENTGATE — audited, policy-driven candidate evaluation.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "TALENTGATE hiring pipeline demo",
    long_about = "Runs the candidate evaluation pipeline over sample data,\n\
                  showing confidence gating, decision gates, the governance\n\
                  bias audit, and the append-only audit ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline over the bundled sample job and resumes.
    Run {
        /// Pipeline policy TOML. Defaults are used when omitted.
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Persist the audit ledger to this JSONL file.
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// List the installed agent capabilities and their thresholds.
    Agents,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging; set RUST_LOG=debug for per-agent detail.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { policy, ledger } => run_pipeline(policy, ledger),
        Command::Agents => list_agents(),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {e}");
        std::process::exit(1);
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_pipeline(policy_path: Option<PathBuf>, ledger_path: Option<PathBuf>) -> PipelineResult<()> {
    let policy = match policy_path {
        Some(path) => PipelinePolicy::from_file(&path)?,
        None => PipelinePolicy::default(),
    };

    let ledger: Arc<dyn AuditSink> = match &ledger_path {
        Some(path) => Arc::new(JsonlLedger::open(path.clone())?),
        None => Arc::new(MemoryLedger::new()),
    };

    let mut orchestrator = Orchestrator::new(policy, ledger)?;
    orchestrator.create_pipeline(sample_job(), sample_candidates())?;
    let state = orchestrator.run_pipeline()?;

    println!();
    println!("TALENTGATE — Candidate Evaluation Pipeline");
    println!("==========================================");
    println!();
    println!("Job:          {} ({})", state.job.title, state.job_id);
    println!("Final stage:  {}", state.current_stage);
    println!(
        "Candidates:   {} evaluated, {} shortlisted, {} ranked",
        state.candidates.len(),
        state.shortlisted().count(),
        state.final_rankings.len()
    );

    if !state.final_rankings.is_empty() {
        println!();
        println!("Rankings (anonymized until human review):");
        for ranking in &state.final_rankings {
            let anonymized = state
                .candidates
                .iter()
                .find(|c| c.profile.candidate_id == ranking.candidate_id)
                .map(|c| c.profile.anonymized_id.as_str())
                .unwrap_or("-");
            println!(
                "  #{} {:<12} composite {:.2} (match {:.2}, test {:.2}) — {:?}",
                ranking.rank,
                anonymized,
                ranking.composite_score,
                ranking.match_score,
                ranking.test_score,
                ranking.recommendation
            );
        }
    }

    if let Some(governance) = &state.governance {
        println!();
        println!(
            "Governance audit: {} (fairness {:.2}, {} findings)",
            if governance.audit_passed { "passed" } else { "FAILED" },
            governance.fairness_score,
            governance.findings.len()
        );
        for finding in &governance.findings {
            println!("  [{:?}] {}: {}", finding.severity, finding.category, finding.description);
        }
    }

    for warning in &state.warnings {
        println!("warning: {warning}");
    }
    for error in &state.errors {
        println!("error: {error}");
    }

    let log = orchestrator.get_audit_log();
    let export = ComplianceExport::from_entries(&state.pipeline_id, &log);
    println!();
    println!(
        "Audit ledger: {} entries ({} decisions, {} gates, {} review requests, {} bias findings, {} pending review)",
        export.total_entries,
        export.decisions,
        export.gates_passed + export.gates_failed,
        export.review_requests,
        export.bias_findings,
        export.pending_review
    );
    if let Some(path) = ledger_path {
        println!("Ledger written to {}", path.display());
    }

    Ok(())
}

fn list_agents() -> PipelineResult<()> {
    let orchestrator = Orchestrator::new(PipelinePolicy::default(), Arc::new(MemoryLedger::new()))?;

    println!("Installed agent capabilities:");
    for descriptor in orchestrator.registry().list() {
        println!(
            "  {:<14} threshold {:.2}  {}",
            descriptor.kind, descriptor.confidence_threshold, descriptor.description
        );
    }
    Ok(())
}

// ── Sample data ───────────────────────────────────────────────────────────────

fn sample_job() -> JobProfile {
    JobProfile {
        job_id: "backend-2031".to_string(),
        title: "Senior Backend Engineer".to_string(),
        description: "We are looking for a backend engineer to build and operate \
                      our storage and scheduling services. The role involves \
                      designing APIs in Rust, tuning PostgreSQL, and running \
                      workloads on Kubernetes. You will own services end to end, \
                      from design review through production operation."
            .to_string(),
        required_skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
        preferred_skills: vec!["Kubernetes".to_string(), "gRPC".to_string()],
        min_experience_months: 48,
        min_education: EducationLevel::Bachelors,
    }
}

fn sample_candidates() -> Vec<CandidateProfile> {
    vec![
        CandidateProfile::new(
            "cand-aisha",
            "aisha@example.com",
            "Backend engineer with 7 years of experience.\n\
             Designed storage services in Rust, operated PostgreSQL and \
             Kubernetes in production, and led API design reviews.\n\
             Master of Science in Computer Science.",
        ),
        CandidateProfile::new(
            "cand-bruno",
            "bruno@example.com",
            "Software developer with 5 years of experience building web \
             services in Rust.\n\
             Comfortable with PostgreSQL schema design and query tuning.\n\
             Bachelor of Engineering.",
        ),
        CandidateProfile::new(
            "cand-chen",
            "chen@example.com",
            "Junior developer with 3 years of experience.\n\
             Built internal tools in Python with some exposure to SQL \
             databases.\n\
             Bachelor of Science.",
        ),
    ]
}
