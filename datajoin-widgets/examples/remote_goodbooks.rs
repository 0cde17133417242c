use datajoin_widgets::{HttpSource, LoadOutcome, RemoteList, RemoteListOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Example: load the real Goodbooks-10k sample over HTTP and print the cards.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let list = RemoteList::new(HttpSource::goodbooks(), RemoteListOptions::default());
    println!("{}", list.status_message());

    match list.load().await {
        LoadOutcome::Loaded { shown } => println!("loaded {shown} books"),
        outcome => println!("{outcome:?}"),
    }
    println!("{}", list.status_message());

    list.for_each_card(u64::MAX, |c| {
        println!("{:>6}  {}  {}  {}", c.key, c.card.title, c.card.body, c.card.badge);
    });
}
