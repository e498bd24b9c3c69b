//! # Tracker Demo Entry Point
//!
//! Simulates a short interactive session against the tracker in debug
//! mode and prints what the collector saw. Acts as the composition root
//! example: one engine, built once, handles passed to every capture site.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracker::{
    track_page_view, AppContext, ComponentHandlers, DomInfo, MemorySink, PageListener, Tracker,
    TrackerConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=================================================");
    println!("  User Tracker - Interaction Telemetry Demo      ");
    println!("=================================================");
    println!();

    // Debug mode: batches are surfaced to the sink, never transmitted.
    let config = TrackerConfig {
        endpoint_url: "http://localhost:8000/api/track".to_string(),
        batch_size: 5,
        flush_interval: Duration::from_secs(2),
        app_name: "DemoShop".to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        debug: true,
        log: false,
    };

    let context = Arc::new(AppContext::new("/", "Home"));
    let sink = Arc::new(MemorySink::new());
    let tracker = Tracker::new(config, context.clone(), sink.clone())?;
    println!("✓ Tracker initialized");
    println!("  - Batch size: 5 events");
    println!("  - Flush interval: 2s");
    println!();

    // One handler triple per component, one listener for the document.
    let buy_button = ComponentHandlers::new(tracker.clone(), "BuyButton");
    let mut campaign = HashMap::new();
    campaign.insert("campaign".to_string(), serde_json::json!("summer-sale"));
    let banner = ComponentHandlers::with_metadata(tracker.clone(), "PromoBanner", campaign);
    let page_listener = PageListener::new(tracker.clone());

    println!("Simulating a session...");
    track_page_view(&tracker);
    banner.on_hover_enter();
    banner.on_click();
    banner.on_hover_leave();

    context.navigate("/shop", "Shop");
    track_page_view(&tracker);
    buy_button.on_hover_enter();
    buy_button.on_click();
    page_listener.on_document_click(DomInfo {
        tag: "A".to_string(),
        id: None,
        class_name: Some("nav-link".to_string()),
        text: Some("Checkout".to_string()),
    });

    // Let the size-triggered flush land, then drain the remainder.
    tokio::time::sleep(Duration::from_millis(100)).await;
    while tracker.queue_size() > 0 {
        tracker.flush_queue().await;
    }
    println!("✓ Session captured");
    println!();

    println!("Collected batches:");
    for (i, batch) in sink.batches().iter().enumerate() {
        println!("  Batch {} ({} events):", i + 1, batch.len());
        for event in batch {
            println!(
                "    - {:<12} {:<10} {:<12} {}",
                event.event_type.as_str(),
                format!("{:?}", event.location_type),
                event.component_name.as_deref().unwrap_or("-"),
                event.page_path
            );
        }
    }
    println!();

    let stats = tracker.stats();
    println!("Tracker Statistics:");
    println!("  - Events tracked:  {}", stats.events_tracked);
    println!("  - Batches flushed: {}", stats.batches_flushed);
    println!("  - Events flushed:  {}", stats.events_flushed);
    println!();
    println!("=================================================");
    println!("  Demo Complete");
    println!("=================================================");

    Ok(())
}
