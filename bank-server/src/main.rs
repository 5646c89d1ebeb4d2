use actix_web::web::Data;
use actix_web::{App, HttpServer};
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, Naming, WriteMode,
};

mod env;
mod handlers;
mod middleware;
mod services;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let mut port = 9000u16;

    let mut args = std::env::args();

    // Eat the first argument, which is the relative path to the executable
    args.next();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--port" => {
                let port_str = {
                    let next_arg = args.next();

                    match next_arg {
                        Some(s) => s,
                        None => {
                            eprintln!("ERROR: --port option specified but no port was given");
                            std::process::exit(1);
                        }
                    }
                };

                port = {
                    let port_result = port_str.parse::<u16>();

                    match port_result {
                        Ok(p) => p,
                        Err(_) => {
                            eprintln!("ERROR: Incorrect format for port. Integer expected");
                            std::process::exit(1);
                        }
                    }
                };

                continue;
            }
            a => {
                eprintln!("ERROR: Invalid argument: {}", &a);
                std::process::exit(1);
            }
        }
    }

    let base_addr = format!("127.0.0.1:{}", &port);

    let log_spec = match LogSpecification::parse(&env::CONF.log_level) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR: Invalid log level '{}': {e}", env::CONF.log_level);
            std::process::exit(1);
        }
    };

    let _logger = Logger::with(log_spec)
        .log_to_file(FileSpec::default().directory("./logs"))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogAndCompressedFiles(60, 365),
        )
        .cleanup_in_background_thread(true)
        .duplicate_to_stdout(Duplicate::All)
        .write_mode(WriteMode::Async)
        .format(|writer, now, record| {
            write!(
                writer,
                "{:5} | {} | {}:{} | {}",
                record.level(),
                now.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
                record.module_path().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .use_utc()
        .start()
        .expect("Failed to start logger");

    let actix_workers = env::CONF.actix_worker_count;

    // To prevent resource starvation, max connections must be at least as large as the number of
    // actix workers
    let db_max_connections = env::CONF.db_max_connections.max(actix_workers as u32);

    log::info!("Connecting to database...");

    let db_thread_pool = bank_common::db::create_db_thread_pool(
        &env::CONF.database_uri(),
        db_max_connections,
        env::CONF.db_idle_timeout,
    );

    log::info!("Successfully connected to database");
    log::info!("Listening on {base_addr} with {actix_workers} workers");

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(db_thread_pool.clone()))
            .configure(services::api::configure)
            .wrap(actix_web::middleware::Logger::default())
    })
    .workers(actix_workers)
    .bind(base_addr)?
    .run()
    .await?;

    // Safe because all other threads have been joined at this point
    unsafe {
        env::CONF.zeroize();
    }

    Ok(())
}
