//! Plain-text clinical summary of an evaluation

use std::fmt;

use crate::evaluation::{EvaluationResult, ParameterScore};

/// Line printed when no diagnosis was emitted
pub const NO_FINDINGS: &str = "No clinically relevant findings";

/// Clinical summary of one evaluation, rendered through [`fmt::Display`]
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a>(pub &'a EvaluationResult);

/// Render the summary block shown to clinicians
#[must_use]
pub fn render_summary(result: &EvaluationResult) -> String {
    Summary(result).to_string()
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "Growth assessment")?;
        for score in &result.scores {
            write!(f, "  ")?;
            write_score_line(f, score)?;
            writeln!(f)?;
        }

        if let Some(preterm) = result.preterm {
            let tables = if preterm.preterm_tables_used {
                "preterm tables"
            } else {
                "standard tables, chronological age"
            };
            writeln!(
                f,
                "Postmenstrual age: {:.1} weeks ({tables})",
                preterm.postmenstrual_age_weeks
            )?;
        }

        if let Some(assessment) = &result.parental_target {
            let target = &assessment.target;
            write!(
                f,
                "Target height: {:.1} cm ({:.1}-{:.1} cm)",
                target.central, target.low, target.high
            )?;
            match assessment.target_percentile {
                Some(p) => writeln!(f, ", percentile {p:.1}")?,
                None => writeln!(f)?,
            }
        }

        if let Some(bone_age) = &result.bone_age {
            writeln!(
                f,
                "Bone age: {:+.1} years vs chronological ({}): {}",
                bone_age.difference_years,
                bone_age.classification,
                bone_age.classification.growth_potential()
            )?;
        }

        match result.highest_severity() {
            None => writeln!(f, "{NO_FINDINGS}")?,
            Some(severity) => {
                writeln!(f, "Findings (highest severity: {severity}):")?;
                for diagnosis in &result.diagnoses {
                    writeln!(
                        f,
                        "  - [{}] {}: {}",
                        diagnosis.severity, diagnosis.label, diagnosis.detail
                    )?;
                    writeln!(f, "    Recommendation: {}", diagnosis.recommendation)?;
                }
            }
        }

        if !result.advisories.is_empty() {
            writeln!(f, "Advisories:")?;
            for advisory in &result.advisories {
                writeln!(f, "  - {advisory}")?;
            }
        }

        Ok(())
    }
}

fn write_score_line(f: &mut fmt::Formatter<'_>, score: &ParameterScore) -> fmt::Result {
    write!(
        f,
        "{}: {:.2} {}",
        score.parameter.display_name(),
        score.value,
        score.unit
    )?;
    match (score.z, score.percentile) {
        (Some(z), Some(p)) => write!(f, ", Z = {z:.2}, percentile {p:.1}")?,
        _ => write!(f, ", not scored (outside reference range)")?,
    }
    if score.derived {
        write!(f, " [derived]")?;
    }
    if let Some(clamp) = &score.clamp {
        write!(
            f,
            " [age {:.1} {} outside table, edge {:.1} used]",
            clamp.requested_age, score.age_unit, clamp.edge_age
        )?;
    }
    Ok(())
}
