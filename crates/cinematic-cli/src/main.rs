use anyhow::{bail, Context, Result};
use cinematic_client::{
    AspectRatio, CinematicClient, GenerationRequest, Job, JobPoller, JobStatus, MediaType,
    PollerConfig, StatusUpdate,
};
use cinematic_shared::{constants::DEFAULT_SERVER_URL, telemetry::init_telemetry};
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "cinematic-cli", version, about = "Submit and follow video generation jobs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the web front end
    #[arg(long, env = "CINEMATIC_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Shared access password
    #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a script and, unless --no-wait, follow the job to the end
    Generate {
        /// Narration script
        #[arg(long)]
        script: String,

        /// 9:16, 16:9 or 1:1
        #[arg(long, default_value_t = AspectRatio::Portrait)]
        aspect_ratio: AspectRatio,

        /// ai-video, ai-images or stock
        #[arg(long, default_value = "ai-video")]
        media_type: MediaType,

        #[arg(long, default_value = "Default")]
        preset: String,

        #[arg(long, default_value = "Narrator (Male)")]
        voice: String,

        /// Print the job id and exit
        #[arg(long)]
        no_wait: bool,
    },
    /// Print one status snapshot
    Status { job_id: String },
    /// Follow a job until it finishes
    Watch { job_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_telemetry("warn")?;
    let cli = Cli::parse();

    let client = CinematicClient::new(&cli.server)?;
    client
        .login(&cli.password)
        .await
        .with_context(|| format!("Login to {} failed", cli.server))?;
    debug!("Session established");

    match cli.command {
        Commands::Generate {
            script,
            aspect_ratio,
            media_type,
            preset,
            voice,
            no_wait,
        } => {
            let request = GenerationRequest {
                aspect_ratio,
                media_type,
                preset,
                voice,
                ..GenerationRequest::new(script)
            };
            handle_generate(&client, &request, no_wait).await?
        }
        Commands::Status { job_id } => {
            let update = client.status(&job_id).await?;
            print_snapshot(&job_id, &update);
        }
        Commands::Watch { job_id } => watch(client, Job::submitted(job_id)).await?,
    }

    Ok(())
}

async fn handle_generate(
    client: &CinematicClient,
    request: &GenerationRequest,
    no_wait: bool,
) -> Result<()> {
    if request.script.trim().is_empty() {
        bail!("Script is empty");
    }

    println!(
        "Script: {} words, about {}s of narration",
        request.word_count(),
        request.estimated_duration_secs()
    );

    let job_id = client.submit(request).await?;
    println!("Job submitted: {}", job_id);

    if no_wait {
        return Ok(());
    }
    watch(client.clone(), Job::submitted(job_id)).await
}

async fn watch(client: CinematicClient, job: Job) -> Result<()> {
    let poller = JobPoller::new(client, PollerConfig::default());
    let job = poller.track(job, print_progress).await;

    match job.status {
        JobStatus::Complete => {
            println!("Done: {}", job.video_url.as_deref().unwrap_or("(no video url)"));
            Ok(())
        }
        JobStatus::Error | JobStatus::TimedOut => {
            bail!("{}", job.error.as_deref().unwrap_or("Generation failed"))
        }
        JobStatus::Idle | JobStatus::Generating => bail!("Job {} did not finish", job.id),
    }
}

fn print_progress(job: &Job) {
    if job.status != JobStatus::Generating {
        return;
    }
    let progress = job
        .progress
        .map(|p| format!("{:>3}%", p))
        .unwrap_or_else(|| "  ?%".to_string());
    println!("[{}] {}", progress, job.message.as_deref().unwrap_or("Generating..."));
}

fn print_snapshot(job_id: &str, update: &StatusUpdate) {
    println!("Job:      {}", job_id);
    println!("Status:   {}", update.status);
    if let Some(progress) = update.progress {
        println!("Progress: {:.0}%", progress);
    }
    if let Some(message) = &update.message {
        println!("Message:  {}", message);
    }
    if let Some(url) = &update.video_url {
        println!("Video:    {}", url);
    }
    if let Some(error) = &update.error {
        println!("Error:    {}", error);
    }
}
