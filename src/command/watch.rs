extern crate log;
extern crate termcolor;
extern crate tokio;

use crate::read::{parse_input, Input};
use leet_tracker::{
    judge::{MetadataClient, Remote, Session, VerdictPoller},
    options::Options,
    settings::SettingsReloader,
    store::ProblemStore,
    tracker::{self, NetworkEvent, SharedTab, SubmissionTracker},
};
use log::warn;
use std::{io::Write, sync::Arc};
use termcolor::{Color, StandardStream};
use tokio::{
    io::{stdin, AsyncBufReadExt, BufReader},
    sync::mpsc,
};

async fn feed(tab: Arc<SharedTab>, reloader: SettingsReloader, tx: mpsc::Sender<NetworkEvent>) {
    let mut lines = BufReader::new(stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(v)) => v,
            Ok(None) => break,
            Err(e) => {
                warn!("Error reading events: {}", e);
                break;
            }
        };
        match parse_input(&line) {
            Ok(Some(Input::Request(event))) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(Some(Input::Tab { url })) => tab.set(url).await,
            Ok(Some(Input::Reload)) => {
                if let Err(e) = reloader.reload().await {
                    warn!("Error reloading settings: {}", e);
                }
            }
            Ok(None) => (),
            Err(e) => warn!("Skipping malformed event line: {}", e),
        }
    }
}

#[allow(unused_must_use)]
pub async fn watch(stdout: &mut StandardStream, options: &Options, store: Arc<ProblemStore>) {
    let remote: Arc<dyn Remote> = match Session::with_proxy(options.proxy.clone()) {
        Ok(v) => Arc::new(v),
        Err(e) => {
            write_error!(stdout, "Error", "{}", e);
            return;
        }
    };
    let (reloader, settings) = match SettingsReloader::load(store.clone()).await {
        Ok(v) => v,
        Err(e) => {
            write_error!(stdout, "Error", "load settings: {}", e);
            return;
        }
    };
    let tab = Arc::new(SharedTab::new());
    let tracker = SubmissionTracker::new(
        tab.clone(),
        VerdictPoller::new(remote.clone(), options.poll.into()),
        MetadataClient::new(remote, &options.base_url),
        store,
        settings,
    );
    let (tx, rx) = tracker::channel();
    write_info!(stdout, "Info", "Watching submissions on {}", options.base_url);
    tokio::join!(tracker.run(rx), feed(tab, reloader, tx));
    write_ok!(stdout, "Finished", "Event stream closed");
}
