//! Reference data: muscle groups and the starter exercise catalogue

use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{
    DomainError, Exercise, MuscleGroup, MuscleGroupParam, Repositories, SelfValidating,
    UnitOfWork,
};
use crate::infrastructure::unit_of_work::SeaOrmUnitOfWork;

use MuscleGroupParam::*;

const EXERCISES: &[(&str, &[MuscleGroupParam])] = &[
    ("Bench Press", &[Chest, Triceps, Shoulders]),
    ("Incline Dumbbell Press", &[Chest, Shoulders]),
    ("Push Up", &[Chest, Triceps, Core]),
    ("Pull Up", &[Back, Biceps]),
    ("Barbell Row", &[Back, Biceps]),
    ("Lat Pulldown", &[Back, Biceps]),
    ("Deadlift", &[Back, Glutes, Hamstrings]),
    ("Back Squat", &[Quads, Glutes]),
    ("Leg Press", &[Quads, Glutes]),
    ("Romanian Deadlift", &[Hamstrings, Glutes]),
    ("Leg Curl", &[Hamstrings]),
    ("Leg Extension", &[Quads]),
    ("Standing Calf Raise", &[Calves]),
    ("Hip Thrust", &[Glutes]),
    ("Hip Abduction Machine", &[Abductors]),
    ("Hip Adduction Machine", &[Adductors]),
    ("Overhead Press", &[Shoulders, Triceps]),
    ("Lateral Raise", &[Shoulders]),
    ("Barbell Shrug", &[Traps]),
    ("Face Pull", &[Shoulders, Traps]),
    ("Barbell Curl", &[Biceps]),
    ("Hammer Curl", &[Biceps, Forearms]),
    ("Wrist Curl", &[Forearms]),
    ("Triceps Pushdown", &[Triceps]),
    ("Skull Crusher", &[Triceps]),
    ("Plank", &[Core]),
    ("Hanging Leg Raise", &[Core]),
    ("Neck Flexion", &[Neck]),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub muscle_groups: usize,
    pub exercises: usize,
}

/// Inserts the muscle groups and exercises that are not stored yet.
/// Running it again is a no-op.
pub async fn seed_reference_data(db: &DatabaseConnection) -> Result<SeedReport, DomainError> {
    let store = SeaOrmUnitOfWork::new(db.clone());
    let txn = store.begin().await?;
    let mut report = SeedReport::default();

    let mut group_ids: HashMap<MuscleGroupParam, Uuid> = HashMap::new();
    let existing = txn.muscle_groups().find_all().await?;

    for &param in MuscleGroupParam::ALL {
        if let Some(group) = existing.iter().find(|g| g.name == param.as_str()) {
            group_ids.insert(param, group.id);
            continue;
        }

        let group = MuscleGroup::create(param.as_str());
        if !group.is_valid() {
            return Err(DomainError::Internal(format!(
                "invalid reference muscle group {}",
                param
            )));
        }
        txn.muscle_groups().create(&group).await?;
        group_ids.insert(param, group.id);
        report.muscle_groups += 1;
    }

    for (name, targets) in EXERCISES {
        if txn.exercises().find_by_name(name).await?.is_some() {
            continue;
        }

        let ids = targets.iter().filter_map(|t| group_ids.get(t).copied()).collect();
        let exercise = Exercise::create(*name, ids);
        if !exercise.is_valid() {
            return Err(DomainError::Internal(format!(
                "invalid reference exercise {}",
                name
            )));
        }
        txn.exercises().create(&exercise).await?;
        report.exercises += 1;
    }

    txn.commit().await?;

    tracing::info!(
        "Reference data seeded: {} muscle groups, {} exercises",
        report.muscle_groups,
        report.exercises
    );
    Ok(report)
}
