// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

use clap::{Parser, Subcommand, ValueEnum};
use fincomms_api::{
    AddEvidenceRequest, ApiResult, AppState, BulkAction, BulkActionRequest, ChangeStageRequest,
    CreateInvoiceRequest, InvoiceDetail, QueueOverviewRequest, ReconciliationRow,
    ValidatePaymentRequest, add_evidence, bulk_action, change_stage, create_invoice,
    import_reconciliation, invoice_detail, queue_overview, request_payment, revert_stage,
    set_payment_blocked, validate_payment,
};
use fincomms_audit::{Actor, AuditEvent, Cause};
use fincomms_domain::InvoiceId;
use fincomms_persistence::InMemoryStore;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::{error, info};

/// `FinComms` - invoice approval queues for reconciliation, AP and payments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON data file. Created on the first write if missing.
    #[arg(short, long, default_value = "fincomms.json")]
    data: PathBuf,

    /// Identifier recorded as the actor of every change
    #[arg(short, long, default_value = "operator")]
    actor: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List one team view with the counts of every view
    List {
        /// all, recon, ap or payment
        #[arg(long)]
        view: Option<String>,
        /// Filter on invoice number, vendor or entity
        #[arg(long)]
        search: Option<String>,
        /// created_at, amount or vendor
        #[arg(long)]
        sort: Option<String>,
        /// Sort ascending (default is descending)
        #[arg(long)]
        asc: bool,
    },
    /// Show one invoice with its evidence and audit history
    Show { id: i64 },
    /// Enter an invoice by hand
    Create {
        invoice_number: String,
        vendor: String,
        amount: Decimal,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        entity: Option<String>,
        #[arg(long)]
        detail: Option<String>,
        /// MISSING_INVOICE or PO_PENDING (default)
        #[arg(long)]
        flow: Option<String>,
    },
    /// Import reconciliation rows from a JSON array file
    Import { file: PathBuf },
    /// Move an invoice to a stage of its flow, by display label
    Stage { id: i64, stage: String },
    /// Move an invoice back one stage
    Revert { id: i64 },
    /// Put an invoice in the payment queue
    RequestPayment { id: i64 },
    /// Confirm a requested payment
    Validate {
        id: i64,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Block payment of an invoice
    Block { id: i64 },
    /// Lift a payment block
    Unblock { id: i64 },
    /// Attach a note or email at the invoice's current stage
    Evidence {
        id: i64,
        body: String,
        /// NOTE or EMAIL
        #[arg(long, default_value = "NOTE")]
        kind: String,
        #[arg(long)]
        subject: Option<String>,
    },
    /// Apply one action to many invoices
    Bulk {
        action: BulkKind,
        /// Target stage label, required for the `stage` action
        #[arg(long, required_if_eq("action", "stage"))]
        stage: Option<String>,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BulkKind {
    Stage,
    Revert,
    RequestPayment,
    Block,
    Unblock,
}

impl CliCommand {
    /// Returns true if the command changes the data file.
    const fn is_write(&self) -> bool {
        !matches!(self, Self::List { .. } | Self::Show { .. })
    }

    const fn describe(&self) -> &'static str {
        match self {
            Self::List { .. } => "List invoices",
            Self::Show { .. } => "Show invoice",
            Self::Create { .. } => "Manual invoice entry",
            Self::Import { .. } => "Reconciliation import",
            Self::Stage { .. } => "Stage change",
            Self::Revert { .. } => "Stage revert",
            Self::RequestPayment { .. } => "Payment request",
            Self::Validate { .. } => "Payment validation",
            Self::Block { .. } | Self::Unblock { .. } => "Payment block change",
            Self::Evidence { .. } => "Evidence entry",
            Self::Bulk { .. } => "Bulk action",
        }
    }
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    invoice: InvoiceDetail,
    history: Vec<&'a AuditEvent>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, Box<dyn std::error::Error>> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn read_rows(path: &Path) -> Result<Vec<ReconciliationRow>, Box<dyn std::error::Error>> {
    let contents: String = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Records the audit events of a write and returns the rendered response.
fn commit<T: Serialize>(
    state: &mut AppState<InMemoryStore>,
    result: ApiResult<T>,
) -> Result<String, Box<dyn std::error::Error>> {
    for event in result.audit_events {
        state.store_mut().record_audit_event(event);
    }
    to_json(&result.response)
}

/// Runs one command against the data file and returns the output to print.
#[allow(clippy::too_many_lines)]
fn run(args: Args, now: OffsetDateTime) -> Result<String, Box<dyn std::error::Error>> {
    let store: InMemoryStore = InMemoryStore::load(&args.data)?;
    let mut state: AppState<InMemoryStore> = AppState::new(store)?;

    let actor: Actor = Actor::new(args.actor.clone(), String::from("user"));
    let cause: Cause = Cause::new(
        format!("cli-{}", now.unix_timestamp()),
        args.command.describe().to_string(),
    );
    let is_write: bool = args.command.is_write();

    let output: String = match args.command {
        CliCommand::List {
            view,
            search,
            sort,
            asc,
        } => {
            let request: QueueOverviewRequest = QueueOverviewRequest {
                view,
                search,
                sort_by: sort,
                ascending: asc,
            };
            to_json(&queue_overview(&mut state, &request)?)?
        }
        CliCommand::Show { id } => to_json(&ShowOutput {
            invoice: invoice_detail(&state, id)?,
            history: state.store().audit_timeline(InvoiceId::new(id)),
        })?,
        CliCommand::Create {
            invoice_number,
            vendor,
            amount,
            currency,
            entity,
            detail,
            flow,
        } => {
            let request: CreateInvoiceRequest = CreateInvoiceRequest {
                invoice_number,
                vendor,
                amount,
                currency,
                entity,
                detail,
                flow_type: flow,
            };
            let result = create_invoice(&mut state, request, &actor, cause)?;
            commit(&mut state, result)?
        }
        CliCommand::Import { file } => {
            let rows: Vec<ReconciliationRow> = read_rows(&file)?;
            let result = import_reconciliation(&mut state, rows, &actor, &cause)?;
            commit(&mut state, result)?
        }
        CliCommand::Stage { id, stage } => {
            let request: ChangeStageRequest = ChangeStageRequest {
                invoice_id: id,
                stage,
            };
            let result = change_stage(&mut state, &request, &actor, cause)?;
            commit(&mut state, result)?
        }
        CliCommand::Revert { id } => {
            let result = revert_stage(&mut state, id, &actor, cause)?;
            commit(&mut state, result)?
        }
        CliCommand::RequestPayment { id } => {
            let result = request_payment(&mut state, id, &actor, cause)?;
            commit(&mut state, result)?
        }
        CliCommand::Validate {
            id,
            reference,
            notes,
        } => {
            let request: ValidatePaymentRequest = ValidatePaymentRequest {
                invoice_id: id,
                payment_reference: reference,
                notes,
            };
            let result = validate_payment(&mut state, request, &actor, cause, now)?;
            commit(&mut state, result)?
        }
        CliCommand::Block { id } => {
            let result = set_payment_blocked(&mut state, id, true, &actor, cause)?;
            commit(&mut state, result)?
        }
        CliCommand::Unblock { id } => {
            let result = set_payment_blocked(&mut state, id, false, &actor, cause)?;
            commit(&mut state, result)?
        }
        CliCommand::Evidence {
            id,
            body,
            kind,
            subject,
        } => {
            let request: AddEvidenceRequest = AddEvidenceRequest {
                invoice_id: id,
                kind,
                body,
                subject,
            };
            let result = add_evidence(&mut state, request, &actor, cause, now)?;
            commit(&mut state, result)?
        }
        CliCommand::Bulk { action, stage, ids } => {
            let action: BulkAction = match action {
                BulkKind::Stage => BulkAction::ApplyStage {
                    stage: stage.unwrap_or_default(),
                },
                BulkKind::Revert => BulkAction::Revert,
                BulkKind::RequestPayment => BulkAction::RequestPayment,
                BulkKind::Block => BulkAction::Block,
                BulkKind::Unblock => BulkAction::Unblock,
            };
            let request: BulkActionRequest = BulkActionRequest {
                invoice_ids: ids,
                action,
            };
            let result = bulk_action(&mut state, request, &actor, &cause)?;
            commit(&mut state, result)?
        }
    };

    if is_write {
        state.store().save(&args.data)?;
    }
    Ok(output)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(data = %args.data.display(), "Opening FinComms data file");

    match run(args, OffsetDateTime::now_utc()) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            error!("{err}");
            Err(err)
        }
    }
}
