//! Subcommand handlers
//!
//! Each handler renders its result as a string so `main` only decides
//! where it goes.

use crate::config::OutputFormat;
use anyhow::{bail, Context};
use estimate_core::catalog::{DESIGN_ACTIVITY_SECTIONS, DISCOVERY_ACTIVITIES};
use estimate_core::{
    activity_hints, aggregate, compute_breakdown, estimate_to_hours, estimate_to_tshirt_size,
    generate_session_code, option_hints, try_finalize, validate, Breakpoints, DesignerLevel,
    Effort, EstimationFactors, FactorKind, Fidelity, SprintAllocation, Vote,
};
use estimate_store::{EstimationService, MemoryStore, ServiceConfig};
use serde_json::json;
use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Read a whole file, or stdin for `-`
pub(crate) fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Map a command-line kind name to its factor kind
pub(crate) fn parse_kind(name: &str) -> Option<FactorKind> {
    let kind = match name {
        "effort" => FactorKind::Effort,
        "sprints" => FactorKind::Sprints,
        "designer-count" => FactorKind::DesignerCount,
        "designer-level" => FactorKind::DesignerLevel,
        "breakpoints" => FactorKind::Breakpoints,
        "fidelity" => FactorKind::Fidelity,
        "meeting-buffer" => FactorKind::MeetingBuffer,
        "iteration-multiplier" => FactorKind::IterationMultiplier,
        _ => return None,
    };
    Some(kind)
}

/// Names accepted by [`parse_kind`]
pub(crate) const KIND_NAMES: [&str; 8] = [
    "effort",
    "sprints",
    "designer-count",
    "designer-level",
    "breakpoints",
    "fidelity",
    "meeting-buffer",
    "iteration-multiplier",
];

/// Score a factor selection document
pub(crate) fn estimate(text: &str, format: OutputFormat) -> anyhow::Result<String> {
    let factors: EstimationFactors =
        serde_json::from_str(text).context("factor selection is not valid JSON")?;
    let complete = validate(&factors).context("selection cannot be scored")?;
    let breakdown = compute_breakdown(&complete);
    tracing::debug!(?breakdown, "scored selection");

    let hours = estimate_to_hours(breakdown.points);
    let size = estimate_to_tshirt_size(breakdown.points);
    if format == OutputFormat::Json {
        let doc = json!({
            "breakdown": breakdown,
            "hours": hours,
            "tshirtSize": size,
        });
        return Ok(serde_json::to_string_pretty(&doc)?);
    }

    let mut out = String::new();
    writeln!(out, "Complexity average: {:.3}", breakdown.complexity_average)?;
    writeln!(out, "Base:               {}", breakdown.base)?;
    writeln!(out, "Activities:         {}", breakdown.activity_points)?;
    writeln!(out, "Subtotal:           {}", breakdown.subtotal)?;
    writeln!(out, "Adjusted:           {}", breakdown.raw)?;
    if breakdown.capped {
        writeln!(out, "Points:             {} (capped)", breakdown.points)?;
    } else {
        writeln!(out, "Points:             {}", breakdown.points)?;
    }
    writeln!(out, "Hours:              {hours}")?;
    write!(out, "T-shirt size:       {size}")?;
    Ok(out)
}

/// Hours bucket and T-shirt size for a point value
pub(crate) fn convert(points: u32, format: OutputFormat) -> anyhow::Result<String> {
    let hours = estimate_to_hours(points);
    let size = estimate_to_tshirt_size(points);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "points": points,
            "hours": hours,
            "tshirtSize": size,
        }))?),
        OutputFormat::Text => Ok(format!("{points} pts: {hours}, size {size}")),
    }
}

/// "Adds N pts" table for one kind, or for everything
pub(crate) fn hints(kind: Option<FactorKind>, format: OutputFormat) -> anyhow::Result<String> {
    let kinds: Vec<FactorKind> = match kind {
        Some(kind) => vec![kind],
        None => FactorKind::ALL.to_vec(),
    };

    if format == OutputFormat::Json {
        let options: Vec<_> = kinds
            .iter()
            .map(|&kind| json!({ "kind": kind, "options": option_hints(kind) }))
            .collect();
        let mut doc = json!({ "factors": options });
        if kind.is_none() {
            doc["activities"] = serde_json::to_value(activity_hints())?;
        }
        return Ok(serde_json::to_string_pretty(&doc)?);
    }

    let mut out = String::new();
    for kind in kinds {
        writeln!(out, "{kind}:")?;
        for hint in option_hints(kind) {
            writeln!(out, "  {:<24} +{} pts", hint.option.label, hint.points)?;
        }
    }
    if kind.is_none() {
        writeln!(out, "activities:")?;
        for hint in activity_hints() {
            writeln!(
                out,
                "  {:<10} {:<28} +{} pts",
                hint.section, hint.activity.label, hint.points
            )?;
        }
    }
    Ok(out.trim_end().to_string())
}

/// Summarize a JSON array of votes
pub(crate) fn aggregate_votes(text: &str, format: OutputFormat) -> anyhow::Result<String> {
    let votes: Vec<Vote> = serde_json::from_str(text).context("vote list is not valid JSON")?;
    let Some(summary) = aggregate(&votes) else {
        return Ok(match format {
            OutputFormat::Json => "null".to_string(),
            OutputFormat::Text => "no votes".to_string(),
        });
    };
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => Ok(format!(
            "{} votes: average {}, min {}, max {}",
            summary.count, summary.average, summary.min, summary.max
        )),
    }
}

/// Task total with buffer and iteration adjustments
pub(crate) fn finalize(base: u32, buffer: f64, multiplier: f64) -> anyhow::Result<String> {
    let total = try_finalize(base, buffer, multiplier)?;
    Ok(format!(
        "{total} pts ({}, size {})",
        estimate_to_hours(total),
        estimate_to_tshirt_size(total)
    ))
}

/// Fresh session codes, one per line
pub(crate) fn codes(count: usize) -> String {
    (0..count)
        .map(|_| generate_session_code().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every catalog with its values
pub(crate) fn catalog(format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        let factors: Vec<_> = FactorKind::ALL
            .iter()
            .map(|&kind| json!({ "kind": kind, "options": kind.catalog() }))
            .collect();
        return Ok(serde_json::to_string_pretty(&json!({
            "factors": factors,
            "discovery": DISCOVERY_ACTIVITIES,
            "design": DESIGN_ACTIVITY_SECTIONS,
        }))?);
    }

    let mut out = String::new();
    for kind in FactorKind::ALL {
        writeln!(out, "{kind}:")?;
        for option in kind.catalog() {
            writeln!(out, "  {:<6} {:<24} {}", option.value, option.label, option.description)?;
        }
    }
    writeln!(out, "Discovery:")?;
    for activity in DISCOVERY_ACTIVITIES {
        writeln!(out, "  {:<28} +{}", activity.id, activity.impact)?;
    }
    for section in DESIGN_ACTIVITY_SECTIONS {
        writeln!(out, "{}:", section.name)?;
        for activity in section.activities {
            writeln!(out, "  {:<28} +{}", activity.id, activity.impact)?;
        }
    }
    Ok(out.trim_end().to_string())
}

/// Run one round in memory: two voters, a reveal and a finalization
pub(crate) async fn demo(config: ServiceConfig) -> anyhow::Result<String> {
    let svc = EstimationService::new(Arc::new(MemoryStore::new()), config);
    let session = svc.create_session("Demo").await?;
    let lead = svc.join(&session.code, "Lead", true).await?;
    let peer = svc.join(&session.code, "Peer", false).await?;
    let task = svc.add_task(session.id, "Checkout redesign").await?;
    svc.start_voting(task.id).await?;

    let detailed = EstimationFactors::new()
        .with_effort(Effort::Large)
        .with_sprints(SprintAllocation::One)
        .with_designers(&[DesignerLevel::Senior, DesignerLevel::Junior])
        .with_breakpoints(Breakpoints::Two)
        .with_fidelity(Fidelity::High)
        .with_discovery("user-research")
        .with_design("usability-testing");
    let quick = EstimationFactors::new()
        .with_effort(Effort::Medium)
        .with_sprints(SprintAllocation::Half)
        .with_designers(&[DesignerLevel::Mid])
        .with_breakpoints(Breakpoints::Single)
        .with_fidelity(Fidelity::Mid);

    let a = svc.submit_vote(task.id, lead.id, &detailed).await?;
    let b = svc.submit_vote(task.id, peer.id, &quick).await?;

    let Some(summary) = svc.reveal(task.id).await? else {
        bail!("demo round produced no votes");
    };
    let done = svc
        .finalize_task(task.id, summary.average, 0.1, 1.0)
        .await?;
    let total = done
        .total_points()
        .context("finalized task has no estimate")?;

    let mut out = String::new();
    writeln!(out, "Session {} ({})", session.name, session.code)?;
    writeln!(out, "  {} voted {}", lead.name, a.value)?;
    writeln!(out, "  {} voted {}", peer.name, b.value)?;
    writeln!(
        out,
        "  average {}, min {}, max {}",
        summary.average, summary.min, summary.max
    )?;
    write!(
        out,
        "  final {} pts, size {}",
        total,
        estimate_to_tshirt_size(total)
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "effort": 5, "sprints": 1, "designerCount": 2, "designerLevels": [0.8, 1.2],
        "breakpoints": 2, "fidelity": 1.5,
        "discoveryActivities": ["user-research"],
        "designActivities": ["usability-testing"]
    }"#;

    #[test]
    fn estimate_text() {
        let out = estimate(SAMPLE, OutputFormat::Text).unwrap();
        assert!(out.contains("Points:             18"));
        assert!(out.ends_with("L"));
    }

    #[test]
    fn estimate_json() {
        let out = estimate(SAMPLE, OutputFormat::Json).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["breakdown"]["points"], 18);
        assert_eq!(doc["hours"], "3-5 days");
    }

    #[test]
    fn incomplete_selection_fails() {
        let err = estimate(r#"{"effort": 5}"#, OutputFormat::Text).unwrap_err();
        assert!(format!("{err:#}").contains("cannot be scored"));
    }

    #[test]
    fn convert_text() {
        assert_eq!(
            convert(18, OutputFormat::Text).unwrap(),
            "18 pts: 3-5 days, size L"
        );
    }

    #[test]
    fn kinds_round_trip_names() {
        for name in KIND_NAMES {
            assert!(parse_kind(name).is_some(), "{name}");
        }
        assert!(parse_kind("colour").is_none());
    }

    #[test]
    fn effort_hints() {
        let out = hints(Some(FactorKind::Effort), OutputFormat::Text).unwrap();
        assert!(out.starts_with("effort:"));
        assert!(!out.contains("activities:"));
    }

    #[test]
    fn aggregate_empty_list() {
        assert_eq!(aggregate_votes("[]", OutputFormat::Text).unwrap(), "no votes");
    }

    #[test]
    fn finalize_reports_total() {
        assert_eq!(finalize(11, 0.2, 2.0).unwrap(), "26 pts (1-2 weeks, size L)");
        assert!(finalize(11, -0.5, 1.0).is_err());
    }

    #[test]
    fn codes_are_one_per_line() {
        let out = codes(3);
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().all(|line| line.len() == 6));
    }

    #[test]
    fn catalog_json_lists_kinds() {
        let doc: serde_json::Value =
            serde_json::from_str(&catalog(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(doc["factors"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn demo_round_completes() {
        let out = demo(ServiceConfig::default()).await.unwrap();
        assert!(out.contains("Lead voted 18"));
        assert!(out.contains("Peer voted 3"));
        assert!(out.contains("final 12 pts"));
    }
}
