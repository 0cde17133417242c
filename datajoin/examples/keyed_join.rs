use datajoin::{KeyedList, reconcile};

fn main() {
    // Example: classify a new dataset against what is currently rendered.
    let rendered = vec![("Aija", 0u32), ("Laura", 1), ("Marta", 2)];
    let join = reconcile(rendered, ["Marta", "Signe", "Aija"], |_, name| *name);
    println!("{join:?}");

    // The same through a live container: elements survive updates by key.
    let mut cards: KeyedList<&str, String> = KeyedList::new();
    for round in [vec!["Aija", "Laura"], vec!["Laura", "Signe", "Aija"]] {
        let stats = cards.join(
            round,
            |_, name| *name,
            |i, name, _| format!("{name} (entered at {i})"),
            |i, _, _, card| card.push_str(&format!(", moved to {i}")),
            |name, _| println!("  exit {name}"),
        );
        println!("{stats:?}");
        for (name, card) in cards.iter() {
            println!("  {name}: {card}");
        }
    }
}
