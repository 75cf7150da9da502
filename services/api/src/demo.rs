use crate::infra::{sample_guest_list, InMemoryRsvpStore};
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use wedding_rsvp::error::AppError;
use wedding_rsvp::rsvp::{ClientMeta, Event, GuestList, RsvpService, RsvpSubmission};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Guest-list CSV to run against; the built-in sample list otherwise.
    #[arg(long)]
    pub(crate) guest_list: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct GuestCheckArgs {
    /// Name to check against the guest list
    #[arg(long)]
    pub(crate) name: String,
    /// Guest-list CSV to check against; the built-in sample list otherwise.
    #[arg(long)]
    pub(crate) guest_list: Option<PathBuf>,
}

fn load_list(path: Option<PathBuf>) -> Result<GuestList, AppError> {
    match path {
        Some(path) => Ok(GuestList::from_csv_path(path)?),
        None => Ok(sample_guest_list()),
    }
}

pub(crate) fn run_guest_check(args: GuestCheckArgs) -> Result<(), AppError> {
    let list = load_list(args.guest_list)?;

    match list.lookup(&args.name) {
        Some(entry) => println!("\"{}\" is invited (matched entry: {entry})", args.name),
        None => println!("\"{}\" is not on the guest list", args.name),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let list = Arc::new(load_list(args.guest_list)?);
    let service = RsvpService::new(list.clone(), Arc::new(InMemoryRsvpStore::default()));

    println!("Wedding RSVP demo ({})", Local::now().date_naive());
    println!("Guest list: {} invited parties", list.len());

    let invited = RsvpSubmission {
        guest_name: "John Smith".to_string(),
        email: "john@example.com".to_string(),
        ceremony_attending: Some("yes".to_string()),
        ceremony_guests: Some("2".to_string()),
        reception_attending: Some("yes".to_string()),
        ..RsvpSubmission::default()
    };
    match service.submit(invited, ClientMeta::unknown()) {
        Ok(receipt) => println!("Accepted {}: {}", receipt.rsvp_id.0, receipt.message),
        Err(error) => println!("Rejected: {error}"),
    }

    let stranger = RsvpSubmission {
        guest_name: "Charlie Crasher".to_string(),
        email: "charlie@example.com".to_string(),
        ceremony_attending: Some("yes".to_string()),
        ..RsvpSubmission::default()
    };
    match service.submit(stranger, ClientMeta::unknown()) {
        Ok(receipt) => println!("Accepted {}: {}", receipt.rsvp_id.0, receipt.message),
        Err(error) => println!("Rejected: {error}"),
    }

    match service.stats() {
        Ok(stats) => {
            println!(
                "Responses: {} of {} invited ({}%)",
                stats.summary.total_rsvps, stats.total_invited, stats.response_rate
            );
            for event in Event::ALL {
                if let Some(entry) = stats.summary.events.get(&event) {
                    println!(
                        "  {:>9}: {} attending, {} guests",
                        event.label(),
                        entry.attending,
                        entry.guests
                    );
                }
            }
        }
        Err(error) => println!("Stats unavailable: {error}"),
    }

    Ok(())
}
