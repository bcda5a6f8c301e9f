use booking_flow::{
    timefmt, BookingController, Identity, LocalScheduling, Phase, SchedulingService,
};
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use clap::Parser;
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

/// Walks one slot booking through the workflow controller against an
/// in-memory scheduling service.
#[derive(Parser)]
struct Args {
    /// Interviewer whose availability is listed
    #[arg(long, default_value = "interviewer-1")]
    interviewer: String,
    /// Booker name
    #[arg(long, default_value = "Jane Doe")]
    name: String,
    /// Booker email
    #[arg(long, default_value = "jane@example.com")]
    email: String,
    /// Timezone used when printing slot times
    #[arg(long, default_value = "UTC")]
    timezone: Tz,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("################");
    println!("# Booking Flow #");
    println!("################");

    let args = Args::parse();

    let service = LocalScheduling::default();
    service.seed_example_slots(3);

    let controller = BookingController::new(service.clone(), Identity::new(args.interviewer));
    let mut updates = controller.state_stream();
    let printer = tokio::spawn(async move {
        while let Some(state) = updates.next().await {
            println!("-> {:?}", state.phase);
        }
    });

    let date = Utc::now().date_naive() + Duration::days(1);
    println!("Slots on {}:", timefmt::format_date(date));
    controller.select_date(date).await;
    for slot in &controller.state().slots {
        println!("  {} [{}]", timefmt::format_slot_range(slot, args.timezone), slot.id);
    }

    let Some(first) = controller.state().slots.first().map(|slot| slot.id.clone()) else {
        println!("No slots available.");
        return;
    };

    if let Err(err) = controller.select_slot(&first) {
        println!("Could not select slot: {err}");
        return;
    }
    if let Err(err) = controller.submit_booking(&args.name, &args.email).await {
        println!("Booking not submitted: {err}");
        return;
    }

    match controller.state().phase {
        Phase::Confirmed { slot_id } => {
            let booked = service.list_slots(date).await.unwrap();
            let slot = booked.iter().find(|slot| slot.id == slot_id).unwrap();
            println!(
                "Booked {} at {}",
                slot_id,
                timefmt::format_slot_start(slot, args.timezone)
            );
        }
        Phase::Failed { reason } => println!("Booking failed: {reason}"),
        other => println!("Unexpected phase: {other:?}"),
    }

    controller.dismiss();
    drop(controller);
    let _ = printer.await;
}
