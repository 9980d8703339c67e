use once_cell::sync::Lazy;
use quickreg::configuration::{get_configuration, DatabaseSettings};
use quickreg::startup::{get_connection_pool, Application};
use quickreg::telemetry;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

impl TestApp {
    /// Posts a raw `application/x-www-form-urlencoded` body to the submission endpoint.
    ///
    /// Redirects are not followed: the tests assert on the `303 See Other` themselves.
    pub async fn post_submission(&self, body: String) -> reqwest::Response {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
            .post(&format!("{}/submissions", &self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_home_html(&self) -> String {
        reqwest::Client::new()
            .get(&format!("{}/", &self.address))
            .send()
            .await
            .expect("Failed to execute request")
            .text()
            .await
            .expect("Failed to read the response body")
    }
}

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // We cannot assign the output of `get_subscriber` to a variable based on the value TEST_LOG because
    // the sink is part of the type returned by `get_subscriber`, therefore they are not the same type.
    // We could work around it, but this is the most straight-forward way of moving forward.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        telemetry::init_subscriber(subscriber);
    } else {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        telemetry::init_subscriber(subscriber);
    }
});

/// We are running tests, so it is not worth it to propagate errors: if we fail to perform the
/// required setup we can just panic and crash all the things.
pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed. All other invocations
    // will instead skip execution.
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Randomize the database name for each test run, to preserve test isolation
        c.database.database_name = Uuid::new_v4().to_string();
        // Use a random OS port
        c.application.port = 0;
        c
    };

    // Create and migrate the database
    configure_database(&configuration.database).await;

    let application = Application::build(configuration.clone())
        .await
        .expect("Failed to build application");

    let address = format!("http://127.0.0.1:{}", application.port());

    // Launch the server as a background task. `tokio::spawn` returns a handle to the spawned
    // future, but we have no use for it here, hence the non-binding let.
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        db_pool: get_connection_pool(&configuration.database),
    }
}

/// The database is a gigantic global variable: all our tests are interacting with it and whatever
/// they leave behind will be available to other tests in the suite as well as to the following test
/// runs.
///
/// We really don't want to have *any* kind of interaction between our tests: it makes our test runs
/// non-deterministic and it leads down the line to spurious test failures that are extremely tricky
/// to hunt down and fix. Therefore, before each test run, we:
/// * create a new logical database with a unique name;
/// * run database migrations on it.
async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(format!(r#"CREATE DATABASE "{}"; "#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to Postgres.");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}
