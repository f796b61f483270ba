use clap::{Parser, Subcommand};
use lingoquest::Config;
use lingoquest::model::entity::{
    DIFFICULTIES, Exercise, ExerciseKind, Lesson, LessonCreate, UserEntity,
    UserEntityCreateUpdate,
};
use lingoquest::model::{CrudRepository, DatabaseError, DbConnection, ModelManager};
use lingoquest::web::dto::lessons::ExerciseBody;
use lingoquest::web::{AuthenticatedUser, UserRole, Validate};

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the lesson DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Manage exercises
    Exercise {
        #[command(subcommand)]
        action: ExerciseCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value_t = false)]
        admin: bool,
    },
    /// Grant the admin role to an existing user
    Promote {
        #[arg(long)]
        username: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "beginner", value_parser = DIFFICULTIES.to_vec())]
        difficulty: String,
        #[arg(long)]
        xp_reward: Option<i32>,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExerciseCommands {
    Add {
        /// Lesson title to attach the exercise to
        #[arg(long)]
        lesson_title: String,
        /// multiple_choice, translation or reading
        #[arg(long, value_parser = parse_kind)]
        kind: ExerciseKind,
        #[arg(long)]
        prompt: String,
        /// Repeat for every choice of a multiple choice exercise
        #[arg(long = "option")]
        options: Vec<String>,
        /// Separate accepted translations with `|`
        #[arg(long)]
        answer: String,
        #[arg(long)]
        explanation: Option<String>,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

fn parse_kind(value: &str) -> Result<ExerciseKind, String> {
    ExerciseKind::parse(value).ok_or_else(|| format!("unknown exercise kind `{value}`"))
}

#[tokio::main]
async fn main() -> lingoquest::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let database_uri = match std::env::var("DATABASE_URL") {
        Ok(uri) => uri,
        Err(_) => Config::get_or_init(true).await.app().database_uri().to_string(),
    };
    let db_con = DbConnection::connect(&database_uri)?;
    db_con.migrate().await?;

    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add { username, password, admin } => {
                let mut user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        username,
                        password_hash: lingoquest::auth::hash_password(&password)?,
                    },
                )
                .await?;
                if admin {
                    user = user.set_role(&mm, &actor, UserRole::Admin).await?;
                }
                println!("User created: {} ({})", user.username(), user.id());
            }

            UserCommands::Promote { username } => {
                let Some(user) = UserEntity::find_by_username(&mm, &actor, &username).await? else {
                    eprintln!("No user named `{username}`");
                    std::process::exit(1);
                };
                let user = user.set_role(&mm, &actor, UserRole::Admin).await?;
                println!("User promoted: {} ({})", user.username(), user.role());
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                title,
                category,
                description,
                difficulty,
                xp_reward,
                order_index,
            } => {
                let lesson = Lesson::create(
                    &mm,
                    &actor,
                    LessonCreate {
                        title,
                        description: Some(description),
                        category: category.to_lowercase(),
                        difficulty: Some(difficulty),
                        xp_reward,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Lesson created: {} ({})", lesson.title(), lesson.id());
            }
        },

        Commands::Exercise { action } => match action {
            ExerciseCommands::Add {
                lesson_title,
                kind,
                prompt,
                options,
                answer,
                explanation,
                order_index,
            } => {
                let lesson_id: uuid::Uuid =
                    sqlx::query_scalar("SELECT id FROM lessons WHERE title = $1")
                        .bind(&lesson_title)
                        .fetch_one(mm.executor())
                        .await
                        .map_err(DatabaseError::SqlxError)?;

                let body = ExerciseBody {
                    kind,
                    prompt,
                    options,
                    answer,
                    explanation,
                    order_index: Some(order_index),
                };
                if let Err(e) = body.validate() {
                    eprintln!("{}", e.client_display());
                    std::process::exit(2);
                }

                let exercise = Exercise::create(&mm, &actor, body.into_create(lesson_id)).await?;
                println!("Exercise created: {} ({})", exercise.kind(), exercise.id());
            }
        },
    }

    Ok(())
}
