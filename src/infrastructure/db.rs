use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        user_type TEXT NOT NULL,
        gender TEXT,
        height_unit TEXT,
        weight_unit TEXT,
        teacher_id TEXT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        cpf TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        email TEXT NOT NULL,
        password TEXT NOT NULL,
        search_text TEXT NOT NULL,
        height REAL,
        weight REAL,
        created_at_utc TEXT NOT NULL,
        updated_at_utc TEXT NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_cpf ON users(cpf)",
    r#"
    CREATE TABLE IF NOT EXISTS refresh_tokens (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        token TEXT NOT NULL,
        expires TEXT NOT NULL,
        is_revoked BOOLEAN NOT NULL DEFAULT 0,
        is_used BOOLEAN NOT NULL DEFAULT 0,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_user_id ON refresh_tokens(user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS muscle_groups (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        created_at_utc TEXT NOT NULL,
        updated_at_utc TEXT NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_muscle_groups_name ON muscle_groups(name)",
    r#"
    CREATE TABLE IF NOT EXISTS exercises (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        muscle_group_ids TEXT NOT NULL,
        created_at_utc TEXT NOT NULL,
        updated_at_utc TEXT NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_exercises_name ON exercises(name)",
    r#"
    CREATE TABLE IF NOT EXISTS workout_exercises (
        id TEXT PRIMARY KEY NOT NULL,
        exercise_id TEXT NOT NULL,
        exercise_name TEXT NOT NULL,
        weight_unit TEXT NOT NULL,
        sets INTEGER NOT NULL,
        reps INTEGER NOT NULL,
        weight REAL NOT NULL,
        created_by TEXT NOT NULL,
        updated_by TEXT NOT NULL,
        created_at_utc TEXT NOT NULL,
        updated_at_utc TEXT NOT NULL,
        FOREIGN KEY(exercise_id) REFERENCES exercises(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS workouts (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        day_of_week TEXT NOT NULL,
        workout_exercise_ids TEXT NOT NULL,
        created_for_user_ids TEXT NOT NULL,
        created_by TEXT NOT NULL,
        updated_by TEXT NOT NULL,
        created_at_utc TEXT NOT NULL,
        updated_at_utc TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_workouts_created_by ON workouts(created_by)",
    r#"
    CREATE TABLE IF NOT EXISTS exercise_history (
        id TEXT PRIMARY KEY NOT NULL,
        exercise_id TEXT NOT NULL,
        weight_unit TEXT NOT NULL,
        "set" INTEGER NOT NULL,
        reps INTEGER NOT NULL,
        weight REAL NOT NULL,
        created_by TEXT NOT NULL,
        created_at_utc TEXT NOT NULL,
        updated_at_utc TEXT NOT NULL,
        FOREIGN KEY(exercise_id) REFERENCES exercises(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_exercise_history_created_by ON exercise_history(created_by)",
    r#"
    CREATE TABLE IF NOT EXISTS workout_history (
        id TEXT PRIMARY KEY NOT NULL,
        workout_id TEXT NOT NULL,
        workout_exercise_ids TEXT NOT NULL,
        created_by TEXT NOT NULL,
        created_at_utc TEXT NOT NULL,
        updated_at_utc TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_workout_history_created_by ON workout_history(created_by)",
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for statement in SCHEMA {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            statement.to_string(),
        ))
        .await?;
    }

    tracing::debug!("Schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
