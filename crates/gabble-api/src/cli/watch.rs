//! `gabble watch` -- join a server and run the polling feed.
//!
//! Three tasks cooperate: the watcher loop polling the server, a printer
//! draining the display channel to stdout, and a stdin pump posting
//! typed lines (echoed locally, which is why the watcher suppresses the
//! server's copies). Ctrl-c cancels the watcher, which sends the one
//! leave request on its way out.

use std::time::Duration;

use anyhow::anyhow;
use console::style;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use gabble_core::watcher::{ChatTransport, ChatWatcher, WatcherExit};

use crate::client::HttpChatTransport;

pub async fn run(name: &str, server: &str, interval_secs: u64) -> anyhow::Result<()> {
    let transport = HttpChatTransport::new(server);
    let (display_tx, mut display_rx) = mpsc::channel(64);

    let watcher = ChatWatcher::join(transport.clone(), name, display_tx)
        .await
        .map_err(|e| anyhow!("could not join {server} as '{name}': {e}"))?
        .with_interval(Duration::from_secs(interval_secs));
    let token = watcher.token();
    let cancel = watcher.cancel_token();

    println!(
        "  {} joined {server} as {}",
        style("✓").green(),
        style(name).cyan()
    );
    println!("  type a message and press enter to post; ctrl-c to leave\n");

    let printer = tokio::spawn(async move {
        while let Some(line) = display_rx.recv().await {
            if line.ends_with("has arrived") || line.ends_with("has departed") {
                println!("  {}", style(line).dim());
            } else {
                println!("  {line}");
            }
        }
    });

    // Posted lines are echoed locally; the watcher filters the server's
    // copies out of the feed.
    let post_transport = transport.clone();
    let post_name = name.to_string();
    let pump = tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            match post_transport.post(&post_name, token, text).await {
                Ok(true) => println!("  ({post_name}) {text}"),
                Ok(false) => eprintln!("  {} message rejected", style("!").yellow()),
                Err(e) => {
                    eprintln!("  {} post failed: {e}", style("!").red());
                    break;
                }
            }
        }
    });

    let mut loop_handle = tokio::spawn(watcher.run());
    let exit = tokio::select! {
        res = &mut loop_handle => res?,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            loop_handle.await?
        }
    };

    pump.abort();
    // The watcher dropped its display sender; let the printer drain.
    printer.await.ok();

    match exit {
        WatcherExit::Left => println!("\n  {} left the chat", style("✓").green()),
        WatcherExit::Failed => println!("\n  {} watching terminated", style("✗").red()),
    }
    Ok(())
}
