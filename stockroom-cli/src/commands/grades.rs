use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use stockroom_catalog::roster::ROSTER_FILE;
use stockroom_catalog::{
    GradeScale, LoadStatus, Roster, Standing, clean_scores, recover_snapshot, save_snapshot,
};

use crate::CliError;
use crate::cli_types::GradeAction;
use crate::display::truncate_str;
use crate::settings::Settings;

pub(crate) fn run_grades(
    data_dir: &Path,
    settings: &Settings,
    action: GradeAction,
) -> Result<(), CliError> {
    let path = data_dir.join(ROSTER_FILE);
    match action {
        GradeAction::Add {
            name,
            scores,
            scale,
        } => run_add(&path, &name, &scores, settings.resolve_scale(scale)),
        GradeAction::Report { scale } => run_report(&path, settings.resolve_scale(scale)),
        GradeAction::Clean { entries } => {
            run_clean(&entries);
            Ok(())
        }
    }
}

/// Unreadable or malformed student data is moved aside before anything is
/// saved back to `path`.
fn load_roster(path: &Path) -> Result<Roster, CliError> {
    let snapshot = recover_snapshot(path)?;
    if let LoadStatus::Unreadable(reason) = &snapshot.status {
        log::warn!("Could not read {}: {reason}", path.display());
    }
    if !snapshot.quarantined.is_empty() {
        log::warn!("{} malformed student entries skipped", snapshot.quarantined.len());
    }
    Ok(Roster::from_students(snapshot.records))
}

fn run_add(path: &Path, name: &str, scores: &[f64], scale: GradeScale) -> Result<(), CliError> {
    let mut roster = load_roster(path)?;
    let student = roster.record(name, scores, scale)?.clone();
    save_snapshot(path, roster.students())?;

    let average = student.average().unwrap_or(0.0);
    log::info!(
        "Recorded {} score(s) for {}: average {:.2}, {}",
        scores.len(),
        student.name.if_supports_color(Stdout, |t| t.bold()),
        average,
        standing_label(student.standing(scale)),
    );
    Ok(())
}

fn run_report(path: &Path, scale: GradeScale) -> Result<(), CliError> {
    let roster = load_roster(path)?;
    if roster.is_empty() {
        log::info!("No students recorded yet.");
        return Ok(());
    }

    log::info!(
        "{}",
        format!("{:<24}  {:>5}  {:>8}  {}", "Student", "Tests", "Average", "Standing")
            .if_supports_color(Stdout, |t| t.bold()),
    );
    let mut passed = 0;
    for row in roster.report(scale) {
        if row.standing == Standing::Passed {
            passed += 1;
        }
        let average = row
            .average
            .map_or_else(|| "-".to_string(), |a| format!("{a:.2}"));
        log::info!(
            "{:<24}  {:>5}  {:>8}  {}",
            truncate_str(&row.name, 24),
            row.scores.len(),
            average,
            standing_label(row.standing),
        );
    }
    crate::log_blank();
    log::info!(
        "{passed} of {} passed (pass mark {} of {})",
        roster.len(),
        scale.pass_mark,
        scale.max,
    );
    Ok(())
}

fn run_clean(entries: &[String]) {
    let cleaned = clean_scores(entries);
    let listed: Vec<String> = cleaned.scores.iter().map(i64::to_string).collect();
    log::info!("Valid scores ({}): {}", cleaned.scores.len(), listed.join(", "));
    if cleaned.rejected.is_empty() {
        log::info!("No corrupt entries.");
    } else {
        log::info!(
            "Corrupt entries ({}): {}",
            cleaned.rejected.len(),
            cleaned
                .rejected
                .join(", ")
                .if_supports_color(Stdout, |t| t.red()),
        );
    }
}

fn standing_label(standing: Standing) -> String {
    match standing {
        Standing::Passed => standing
            .as_str()
            .if_supports_color(Stdout, |t| t.green())
            .to_string(),
        Standing::Failed => standing
            .as_str()
            .if_supports_color(Stdout, |t| t.red())
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn scores_accumulate_per_student() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ROSTER_FILE);
        run_add(&path, "Ana", &[50.0, 70.0], GradeScale::PERCENT).unwrap();
        run_add(&path, " ana ", &[90.0], GradeScale::PERCENT).unwrap();

        let roster = load_roster(&path).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.students()[0].scores, vec![50.0, 70.0, 90.0]);
        assert_eq!(roster.report(GradeScale::PERCENT)[0].standing, Standing::Passed);
    }

    #[test]
    fn out_of_scale_scores_are_not_saved() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ROSTER_FILE);
        let err = run_add(&path, "Luis", &[4.0, 7.5], GradeScale::FIVE_POINT).unwrap_err();
        assert!(matches!(err, CliError::Catalog(_)));
        assert!(!path.exists());
    }

    #[test]
    fn malformed_students_survive_an_add() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ROSTER_FILE);
        std::fs::write(
            &path,
            r#"[{"nombre": "Ana", "notas": [80]}, {"nombre": "Luis", "notas": "ochenta"}]"#,
        )
        .unwrap();

        run_add(&path, "Sofia", &[90.0], GradeScale::PERCENT).unwrap();

        let roster = load_roster(&path).unwrap();
        assert_eq!(roster.len(), 2);
        let rejected =
            std::fs::read_to_string(tmp.path().join("alumnos.rejected.json")).unwrap();
        assert!(rejected.contains(r#""nombre": "Luis""#));
        assert!(rejected.contains(r#""notas": "ochenta""#));
    }

    #[test]
    fn unreadable_roster_is_kept_aside() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ROSTER_FILE);
        let original = r#"{"nombre": "Ana", "notas": [80]}"#;
        std::fs::write(&path, original).unwrap();

        run_add(&path, "Sofia", &[90.0], GradeScale::PERCENT).unwrap();

        let backup = tmp.path().join("alumnos.corrupt");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), original);
        assert_eq!(load_roster(&path).unwrap().len(), 1);
    }
}
