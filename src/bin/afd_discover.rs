// # afd-discover CLI
//
// Small demonstration driver: builds a table in memory and runs discovery
// against it, printing every emitted FD. Loading a table from CSV is an
// external collaborator's job, not this crate's; wire one in before a real
// dataset lands here.

use afd_discover::{discover, DiscoveryConfig, Fd, MeasureKind, Table};
use tracing::info;

fn demo_table() -> Table {
    Table::from_rows(
        vec!["employee_id".into(), "department".into(), "manager".into()],
        vec![
            vec!["1".into(), "eng".into(), "alice".into()],
            vec!["2".into(), "eng".into(), "alice".into()],
            vec!["3".into(), "sales".into(), "bob".into()],
            vec!["4".into(), "sales".into(), "bob".into()],
            vec!["5".into(), "eng".into(), "carol".into()],
        ],
    )
    .expect("demo table columns are well-formed")
}

fn main() {
    tracing_subscriber::fmt().with_target(false).with_thread_ids(true).with_level(true).init();

    info!("afd-discover demo run");

    let table = demo_table();
    let config = DiscoveryConfig { max_error: 0.0, measure: MeasureKind::G3, ..Default::default() };

    match discover(&table, &config) {
        Ok(fds) => print_report(&table, &fds),
        Err(e) => eprintln!("discovery failed: {e}"),
    }
}

fn print_report(table: &Table, fds: &[Fd]) {
    println!("discovered {} approximate functional dependencies:", fds.len());
    for fd in fds {
        let lhs_names: Vec<&str> = fd.lhs.to_sorted_vec().iter().map(|&c| table.column_name(c)).collect();
        println!("  {{{}}} -> {}  (error = {:.4})", lhs_names.join(", "), table.column_name(fd.rhs), fd.error);
    }
}
