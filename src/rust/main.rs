use personality_predictor::animation::{fetch_animation, DEFAULT_ANIMATION_URL};
use personality_predictor::dataset::DEFAULT_DATASET_PATH;
use personality_predictor::web::{self, AppState, ModelStatus};
use personality_predictor::{Answer, Classifier, ModelStore, PredictionForm, Predictor, RuntimeConfig};
use log::{error, info};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    model: ModelArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Args)]
struct ModelArgs {
    /// Path to the ONNX model (defaults to $PERSONALITY_MODEL, then best_personality_model.onnx)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// JSON file with the class labels in probability order (defaults to <model>.classes.json)
    #[arg(long, global = true)]
    classes: Option<PathBuf>,

    /// Name of the probability output of the ONNX graph
    #[arg(long, global = true)]
    probability_output: Option<String>,

    /// URL to download the model from when the file is missing
    #[arg(long, global = true)]
    model_url: Option<String>,

    /// Expected SHA-256 of the model file
    #[arg(long, global = true)]
    model_sha256: Option<String>,

    /// ONNX Runtime intra-op threads
    #[arg(long, global = true, default_value_t = 1)]
    intra_threads: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web app (default)
    Serve(ServeArgs),
    /// Predict once from command-line answers
    Predict(PredictArgs),
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8501")]
    bind: SocketAddr,

    /// CSV file shown in the dataset preview
    #[arg(long, default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Lottie animation shown above the form
    #[arg(long, default_value = DEFAULT_ANIMATION_URL)]
    animation_url: String,

    /// Skip fetching the animation
    #[arg(long)]
    no_animation: bool,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            dataset: PathBuf::from(DEFAULT_DATASET_PATH),
            animation_url: DEFAULT_ANIMATION_URL.to_string(),
            no_animation: false,
        }
    }
}

#[derive(clap::Args)]
struct PredictArgs {
    /// Hours per day spent alone (0-12)
    #[arg(long, default_value_t = 5.0)]
    time_spent_alone: f32,
    /// Stage fear: Ya or Tidak
    #[arg(long, default_value_t = Answer::No)]
    stage_fear: Answer,
    /// Social events attended per month (0-10)
    #[arg(long, default_value_t = 5.0)]
    social_event_attendance: f32,
    /// Times going outside per week (0-7)
    #[arg(long, default_value_t = 3.0)]
    going_outside: f32,
    /// Drained after socializing: Ya or Tidak
    #[arg(long, default_value_t = Answer::No)]
    drained_after_socializing: Answer,
    /// Size of the circle of friends (0-15)
    #[arg(long, default_value_t = 7.0)]
    friends_circle_size: f32,
    /// Social media posts per week (0-10)
    #[arg(long, default_value_t = 4.0)]
    post_frequency: f32,
}

impl From<&PredictArgs> for PredictionForm {
    fn from(args: &PredictArgs) -> Self {
        PredictionForm {
            time_spent_alone: args.time_spent_alone,
            stage_fear: args.stage_fear,
            social_event_attendance: args.social_event_attendance,
            going_outside: args.going_outside,
            drained_after_socializing: args.drained_after_socializing,
            friends_circle_size: args.friends_circle_size,
            post_frequency: args.post_frequency,
        }
    }
}

async fn load_classifier(args: &ModelArgs) -> anyhow::Result<Classifier> {
    let model_path = args.model.clone().unwrap_or_else(ModelStore::default_model_path);
    let mut store = ModelStore::new(&model_path);
    if let Some(url) = &args.model_url {
        store = store.with_source_url(url);
    }
    if let Some(digest) = &args.model_sha256 {
        store = store.with_sha256(digest);
    }
    let model_path = store.ensure_available().await?;

    let config = RuntimeConfig {
        intra_threads: args.intra_threads,
        ..RuntimeConfig::default()
    };
    let mut builder = Classifier::builder()
        .with_runtime_config(config)
        .with_model_file(&model_path)?;

    let classes_path = args.classes.clone().unwrap_or_else(|| store.classes_path());
    if args.classes.is_some() || classes_path.exists() {
        builder = builder.with_classes_file(&classes_path)?;
    }
    if let Some(name) = &args.probability_output {
        builder = builder.with_probability_output(name);
    }

    Ok(builder.build()?)
}

async fn serve(model_args: &ModelArgs, args: ServeArgs) -> anyhow::Result<()> {
    info!("=== Starting Personality Predictor ===");

    let start_time = Instant::now();
    let model = match load_classifier(model_args).await {
        Ok(classifier) => {
            info!("Model ready (took {:.2?}), classes: {:?}", start_time.elapsed(), classifier.info().class_labels);
            ModelStatus::Ready(Predictor::new(Arc::new(classifier)))
        }
        Err(e) => {
            error!("Failed to load model: {:#}", e);
            ModelStatus::Unavailable(format!("Gagal memuat model: {}", e))
        }
    };

    let animation = if args.no_animation {
        None
    } else {
        fetch_animation(&args.animation_url).await
    };

    let state = AppState::new(model, args.dataset).with_animation(animation);
    web::serve(args.bind, Arc::new(state)).await?;
    Ok(())
}

async fn predict_once(model_args: &ModelArgs, args: &PredictArgs) -> anyhow::Result<()> {
    let classifier = load_classifier(model_args).await?;
    let predictor = Predictor::new(Arc::new(classifier));

    let record = PredictionForm::from(args).into_record()?;
    info!("Input: {:?}", record);

    let prediction = predictor.predict(record)?;
    let mut scores = prediction.probabilities.clone();
    scores.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap_or(std::cmp::Ordering::Equal));

    println!("\nResults:");
    println!("  Predicted class: {}", prediction.label);
    println!("  {}", prediction.personality.profile().headline);
    println!("  Probabilities (sorted):");
    for score in scores {
        println!("    {}: {:.1}%", score.label, score.probability * 100.0);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    personality_predictor::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Predict(args)) => predict_once(&cli.model, &args).await,
        Some(Command::Serve(args)) => serve(&cli.model, args).await,
        None => serve(&cli.model, ServeArgs::default()).await,
    }
}
