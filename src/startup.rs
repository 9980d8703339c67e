use crate::configuration::{DatabaseSettings, Settings};
use crate::form::SubmissionForm;
use crate::routes;
use crate::store::PgRecordStore;
use actix_web::{dev::Server, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tokio::sync::Mutex;
use tracing_actix_web::TracingLogger;

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, std::io::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let store = PgRecordStore::new(connection_pool);

        // The one automatic refresh of the recent list happens here, before the form is
        // exposed to any user interaction. The pool is lazy, so a store that is unreachable
        // at boot only costs us an empty initial list - the failure stays non-fatal.
        let form = SubmissionForm::activate(store).await;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );

        let listener = TcpListener::bind(&address)?;
        // Retrieve the port assigned to us by the OS
        let port = listener.local_addr()?.port();
        let server = run(listener, form)?;

        // We "save" the bound port in one of `Application`'s fields.
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// A more expressive name that makes it clear that this function only returns when the
    /// application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    form: SubmissionForm<PgRecordStore>,
) -> Result<Server, std::io::Error> {
    // Every handler funnels through the same form instance; the mutex serializes all
    // interactions with it, which is the HTTP counterpart of the original single UI event
    // loop and makes the in-flight-submission guard observable.
    let form = web::Data::new(Mutex::new(form));
    let server = HttpServer::new(move || {
        App::new()
            // Middlewares are added using the `wrap` method on `App`
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(routes::health_check))
            .route("/", web::get().to(routes::home))
            .route("/submissions", web::post().to(routes::submit))
            // Register the shared form as part of the application state
            .app_data(form.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
