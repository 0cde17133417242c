use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use datajoin_widgets::{
    Control, DatasetSource, LoadError, Page, RemoteList, RemoteListOptions,
};
use tracing_subscriber::EnvFilter;

/// A canned slice of Goodbooks-10k, so the example runs offline.
struct Canned;

#[async_trait(?Send)]
impl DatasetSource for Canned {
    async fn fetch(&self) -> Result<String, LoadError> {
        Ok("\
book_id,title,authors,average_rating,ratings_count
1,The Hunger Games,Suzanne Collins,4.34,4780653
2,Harry Potter and the Sorcerer's Stone,J.K. Rowling/Mary GrandPré,4.44,4602479
3,Twilight,Stephenie Meyer,3.57,3866839
4,To Kill a Mockingbird,Harper Lee,4.25,3198671
5,The Great Gatsby,F. Scott Fitzgerald,3.89,2683664
6,The Fault in Our Stars,John Green,4.26,2346404
7,The Hobbit,J.R.R. Tolkien,4.25,2071616
8,The Catcher in the Rye,J.D. Salinger,3.79,2044241
"
        .to_owned())
    }
}

fn print_page<S: DatasetSource, G: rand::Rng>(page: &Page<S, G>, now_ms: u64) {
    for section in page.sections() {
        println!("== {} [{}]", section.heading, section.control.label());
        println!("   {}", section.hint);
    }
    page.chart().for_each_bar(now_ms, |b| {
        println!(
            "   bar #{} value={} y={:.1} h={:.1}{}",
            b.index + 1,
            b.value,
            b.rect.y,
            b.rect.height,
            if b.exiting { " (exiting)" } else { "" }
        );
    });
    page.flip_list().for_each_card(now_ms, |c| {
        let r = c.bounding_box();
        println!("   card {:<6} at ({:.0}, {:.0})", c.key, r.x, r.y);
    });
    page.remote().for_each_card(now_ms, |c| {
        println!(
            "   book {:<3} {} {} {} opacity={:.2}",
            c.key, c.card.title, c.card.body, c.card.badge, c.opacity
        );
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Example: drive all three widgets from simulated clicks and frames.
    //
    // Run with `RUST_LOG=datajoin=trace,datajoin_widgets=debug` and `--features tracing`
    // to see the joins as they happen.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let now = Arc::new(AtomicU64::new(0));
    let clock = Arc::clone(&now);
    let remote = RemoteList::new(Canned, RemoteListOptions::default())
        .with_clock(move || clock.load(Ordering::Relaxed));
    let mut page = Page::new(remote, rand::rng(), 0);

    let clicks = [
        (500, Control::RandomizeData),
        (1_500, Control::ShuffleParticipants),
        (2_500, Control::LoadRemote),
        (3_500, Control::RandomizeData),
        (4_500, Control::ShuffleParticipants),
    ];

    let mut now_ms = 0u64;
    for (at_ms, control) in clicks {
        while now_ms < at_ms {
            now_ms += 16;
            now.store(now_ms, Ordering::Relaxed);
            page.tick(now_ms);
        }
        println!("-- t={now_ms} click {:?}", control.label());
        page.activate(control, now_ms).await;
    }

    while page.tick(now_ms) {
        now_ms += 16;
        now.store(now_ms, Ordering::Relaxed);
    }
    print_page(&page, now_ms);
}
