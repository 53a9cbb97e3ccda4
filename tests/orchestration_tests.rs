use std::io::Write;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use rosterget::core::action::{Action, Effect, QueryRequest, update};
use rosterget::core::orchestrator::Phase;
use rosterget::core::screen::Screen;
use rosterget::core::state::App;
use rosterget::table::{FileSource, QueryKind};
use rosterget::tui::worker::{Job, Worker};
use tempfile::NamedTempFile;

// ============================================================================
// Helper Functions
// ============================================================================

const ROSTER_CSV: &str = "\
Name,Community Name,Email Address
Al,Book Club,al@example.com
Al,Chess Club,al@example.com
Bea,Book Club,bea@example.com
Cy,Chess Club,cy@example.com
Bea,Chess Club,bea@example.com
";

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Plays the UI loop's part: hands spawn effects to the worker.
fn perform(effect: Effect, worker: &Worker) {
    match effect {
        Effect::SpawnLoad(ticket) => worker.submit(Job::Load(ticket)),
        Effect::SpawnQuery(ticket) => worker.submit(Job::Query(ticket)),
        _ => {}
    }
}

/// Feed worker results back through `update` until nothing is in flight.
fn settle(app: &mut App, worker: &Worker, rx: &mpsc::Receiver<Action>) {
    while app.orchestrator.in_flight().is_some() {
        let action = rx
            .recv_timeout(Duration::from_secs(10))
            .expect("worker result");
        let effect = update(app, action);
        perform(effect, worker);
    }
}

fn dispatch(app: &mut App, worker: &Worker, action: Action) {
    let effect = update(app, action);
    perform(effect, worker);
}

fn texts(app: &App) -> Vec<String> {
    app.activity.iter().map(|l| l.text.clone()).collect()
}

fn kind_index(kind: QueryKind) -> usize {
    QueryKind::ALL.iter().position(|k| *k == kind).unwrap()
}

fn run_query(app: &mut App, worker: &Worker, rx: &mpsc::Receiver<Action>, kind: QueryKind, search: &str) {
    dispatch(app, worker, Action::RequestQuery);
    assert_eq!(app.screens.top(), &Screen::QueryForm);
    dispatch(
        app,
        worker,
        Action::QueryFormDismissed(Some(QueryRequest {
            search: search.to_string(),
            kind_index: kind_index(kind),
        })),
    );
    settle(app, worker, rx);
}

// ============================================================================
// End-to-end: file on disk → worker → update()
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_load_then_query_from_csv() {
    let file = write_csv(ROSTER_CSV);
    let (tx, rx) = mpsc::channel();
    let worker = Worker::spawn(Arc::new(FileSource), tx);
    let mut app = App::new(100);

    dispatch(
        &mut app,
        &worker,
        Action::SubmitPath(file.path().to_string_lossy().into_owned()),
    );
    assert_eq!(app.phase(), Phase::Loading);
    settle(&mut app, &worker, &rx);

    assert_eq!(app.phase(), Phase::Ready);
    assert_eq!(app.screens.depth(), 1);
    assert!(texts(&app).contains(&"Loaded table successfully. (5 rows)".to_string()));

    run_query(&mut app, &worker, &rx, QueryKind::CommunitiesByName, "Bea");
    assert_eq!(
        app.activity.last().unwrap().text,
        "Communities for 'Bea' (2): Book Club, Chess Club"
    );

    run_query(&mut app, &worker, &rx, QueryKind::RosterEmailsByCommunity, "Chess Club");
    assert_eq!(
        app.activity.last().unwrap().text,
        "Email Address for community 'Chess Club' (3): al@example.com, cy@example.com, bea@example.com"
    );

    run_query(&mut app, &worker, &rx, QueryKind::RowsByName, "Al");
    assert_eq!(app.activity.last().unwrap().text, "Rows for 'Al': row 2, 3");

    assert_eq!(app.screens.depth(), 1);
    worker.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_nested_query_logs_each_roster() {
    let file = write_csv(ROSTER_CSV);
    let (tx, rx) = mpsc::channel();
    let worker = Worker::spawn(Arc::new(FileSource), tx);
    let mut app = App::new(100);

    dispatch(
        &mut app,
        &worker,
        Action::SubmitPath(file.path().to_string_lossy().into_owned()),
    );
    settle(&mut app, &worker, &rx);
    run_query(&mut app, &worker, &rx, QueryKind::AllRosterNamesByName, "Al");

    let lines = texts(&app);
    let header = lines
        .iter()
        .position(|l| l == "All roster names for 'Al' (2 rosters):")
        .expect("nested header");
    assert_eq!(lines[header + 1], "  [1] Al, Bea");
    assert_eq!(lines[header + 2], "  [2] Al, Cy, Bea");
    worker.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_file_reports_and_stays_idle() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    let (tx, rx) = mpsc::channel();
    let worker = Worker::spawn(Arc::new(FileSource), tx);
    let mut app = App::new(100);

    dispatch(
        &mut app,
        &worker,
        Action::SubmitPath(missing.to_string_lossy().into_owned()),
    );
    settle(&mut app, &worker, &rx);

    assert_eq!(app.phase(), Phase::Idle);
    assert_eq!(app.screens.top(), &Screen::Main);
    assert_eq!(app.activity.last().unwrap().text, "File Not Found");

    dispatch(&mut app, &worker, Action::RequestQuery);
    assert_eq!(app.screens.top(), &Screen::Main);
    assert_eq!(app.activity.last().unwrap().text, "No table loaded");
    worker.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_duplicate_header_is_malformed() {
    let file = write_csv("Name,Name\nAl,Bea\n");
    let (tx, rx) = mpsc::channel();
    let worker = Worker::spawn(Arc::new(FileSource), tx);
    let mut app = App::new(100);

    dispatch(
        &mut app,
        &worker,
        Action::SubmitPath(file.path().to_string_lossy().into_owned()),
    );
    settle(&mut app, &worker, &rx);

    assert_eq!(app.phase(), Phase::Idle);
    assert_eq!(app.activity.last().unwrap().text, "Couldn't Load");
    worker.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_superseded_load_never_surfaces() {
    let first = write_csv("Name,Community Name,Email Address\nOld,Old Club,old@example.com\n");
    let second = write_csv(ROSTER_CSV);
    let (tx, rx) = mpsc::channel();
    let worker = Worker::spawn(Arc::new(FileSource), tx);
    let mut app = App::new(100);

    dispatch(
        &mut app,
        &worker,
        Action::SubmitPath(first.path().to_string_lossy().into_owned()),
    );
    dispatch(
        &mut app,
        &worker,
        Action::SubmitPath(second.path().to_string_lossy().into_owned()),
    );
    // One overlay no matter how many loads were submitted
    assert_eq!(app.screens.depth(), 2);
    settle(&mut app, &worker, &rx);

    assert_eq!(app.screens.depth(), 1);
    assert_eq!(app.orchestrator.table().unwrap().row_count(), 5);
    let loaded: Vec<String> = texts(&app)
        .into_iter()
        .filter(|l| l.starts_with("Loaded table"))
        .collect();
    assert_eq!(loaded, vec!["Loaded table successfully. (5 rows)".to_string()]);

    // Drain whatever the superseded load may still deliver; none of it lands.
    worker.shutdown().await;
    for action in rx.try_iter() {
        update(&mut app, action);
    }
    assert_eq!(app.orchestrator.table().unwrap().row_count(), 5);
    assert_eq!(app.screens.depth(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_load_returns_to_main() {
    let file = write_csv(ROSTER_CSV);
    let (tx, rx) = mpsc::channel();
    let worker = Worker::spawn(Arc::new(FileSource), tx);
    let mut app = App::new(100);

    dispatch(
        &mut app,
        &worker,
        Action::SubmitPath(file.path().to_string_lossy().into_owned()),
    );
    dispatch(&mut app, &worker, Action::CancelTask);
    assert_eq!(app.screens.top(), &Screen::Main);
    assert_eq!(app.phase(), Phase::Idle);

    worker.shutdown().await;
    for action in rx.try_iter() {
        update(&mut app, action);
    }
    assert_eq!(app.phase(), Phase::Idle);
    assert_eq!(app.activity.last().unwrap().text, "Cancelled");
}
