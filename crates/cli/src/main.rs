use api_shared::wire::{AssessmentRes, ReviewReq, SubmitAssessmentReq};
use api_shared::ApiClient;
use clap::{Parser, Subcommand};
use intake_core::{
    gated_products_from_env_value, AssessmentService, Catalog, CoreConfig, DEFAULT_DATA_DIR,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Intake risk-assessment service CLI")]
struct Cli {
    /// Base URL of a running intake service. Without this, commands
    /// operate on local storage directly (INTAKE_DATA_DIR).
    #[arg(long, global = true)]
    remote: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all stored risk assessments
    List,
    /// Show one assessment in full
    Show {
        /// Assessment id (32 lowercase hex characters)
        id: String,
    },
    /// Submit a completed questionnaire from a JSON file
    Submit {
        /// Path to a JSON file in the POST /risk-assessments body format
        file: PathBuf,
    },
    /// Record an admin review decision
    Review {
        /// Assessment id (32 lowercase hex characters)
        id: String,
        /// New status: Pending, Reviewed, Approved, Rejected or Requires-Followup
        status: String,
        /// Reviewer identity to record
        #[arg(long)]
        reviewer: Option<String>,
        /// Admin notes to attach
        #[arg(long)]
        notes: Option<String>,
        /// Grant or revoke restricted-product purchase authorization
        #[arg(long)]
        can_purchase_mounjaro: Option<bool>,
        /// Authorization expiry (RFC 3339); omit for indefinite
        #[arg(long)]
        expiry: Option<String>,
    },
}

fn local_cfg() -> Result<Arc<CoreConfig>, Box<dyn std::error::Error>> {
    let data_dir = std::env::var("INTAKE_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let gated_products =
        gated_products_from_env_value(std::env::var("INTAKE_GATED_PRODUCTS").ok());
    Ok(Arc::new(CoreConfig::new(
        PathBuf::from(data_dir),
        gated_products,
    )?))
}

fn print_summary_line(id: &str, res: &AssessmentRes) {
    println!(
        "ID: {}, Patient: {}, Status: {}, BMI: {} ({}), Authorised: {}",
        id,
        res.patient.name,
        res.status,
        res.bmi,
        res.bmi_category,
        res.can_purchase_restricted_product
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => match &cli.remote {
            Some(base_url) => {
                let listing = ApiClient::new(base_url).list()?;
                if listing.assessments.is_empty() {
                    println!("No assessments found.");
                } else {
                    for res in &listing.assessments {
                        print_summary_line(&res.id, res);
                    }
                }
            }
            None => {
                let records = AssessmentService::new(local_cfg()?).list();
                if records.is_empty() {
                    println!("No assessments found.");
                } else {
                    for record in &records {
                        let res = AssessmentRes::from(record);
                        print_summary_line(&res.id, &res);
                    }
                }
            }
        },
        Some(Commands::Show { id }) => {
            let res = match &cli.remote {
                Some(base_url) => ApiClient::new(base_url).fetch(&id)?,
                None => {
                    let service = AssessmentService::with_id(local_cfg()?, &id)?;
                    AssessmentRes::from(&service.load()?)
                }
            };
            println!("{}", serde_json::to_string_pretty(&res)?);
        }
        Some(Commands::Submit { file }) => {
            let contents = std::fs::read_to_string(&file)?;
            let req: SubmitAssessmentReq = serde_json::from_str(&contents)?;
            let id = match &cli.remote {
                Some(base_url) => ApiClient::new(base_url).submit(&req)?.id,
                None => {
                    let draft = req.into_draft()?;
                    let service = AssessmentService::new(local_cfg()?)
                        .submit(&Catalog::standard(), draft)?;
                    service.assessment_id().to_string()
                }
            };
            println!("Submitted assessment {}", id);
        }
        Some(Commands::Review {
            id,
            status,
            reviewer,
            notes,
            can_purchase_mounjaro,
            expiry,
        }) => {
            let req = ReviewReq {
                status,
                admin_notes: notes,
                reviewed_by: reviewer,
                can_purchase_mounjaro,
                authorization_expiry: expiry,
            };
            let res = match &cli.remote {
                Some(base_url) => ApiClient::new(base_url).review(&id, &req)?,
                None => {
                    let decision = req.into_decision()?;
                    let service = AssessmentService::with_id(local_cfg()?, &id)?;
                    AssessmentRes::from(&service.save_review(decision)?)
                }
            };
            println!(
                "Review saved: status {}, authorised {}",
                res.status, res.can_purchase_restricted_product
            );
        }
        None => {
            println!("No command given. Try `intake list` or `intake --help`.");
        }
    }

    Ok(())
}
