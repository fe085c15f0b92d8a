//! Container startup orchestrator.
//!
//! The container's sole entry command: brings an application instance from
//! "just started" to "serving" and then becomes the application server.
//!
//! # Architecture Overview
//!
//! ```text
//!   environment ──▶ ┌──────────────┐
//!                   │    config    │  RunConfig (resolved once, immutable)
//!                   └──────┬───────┘
//!                          ▼
//!                   ┌──────────────┐      ┌──────────────┐
//!                   │  resilience  │─────▶│   migrate    │  retried with
//!                   │ retry+backoff│◀─────│  (process)   │  1s, 2s, 4s, ...
//!                   └──────┬───────┘      └──────────────┘
//!                          ▼
//!                   ┌──────────────┐      ┌──────────────┐
//!                   │  lifecycle   │─────▶│collectstatic │  best effort
//!                   │ orchestrator │      └──────────────┘
//!                   └──────┬───────┘
//!                          ▼ exec
//!                   ┌──────────────┐
//!                   │   gunicorn   │  0.0.0.0:80, same PID
//!                   └──────────────┘
//! ```
//!
//! # Environment variables
//!
//! | Variable                          | Default                | Description                          |
//! |-----------------------------------|------------------------|--------------------------------------|
//! | `SETTINGS_MODULE`                 | `app.settings`         | Settings module for all sub-commands |
//! | `DB_WAIT_MAX_TRIES`               | `6`                    | Readiness attempts                   |
//! | `DB_WAIT_FAIL_OPEN`               | `true`                 | Serve even if readiness never passed |
//! | `DB_WAIT_BASE_DELAY`              | `1`                    | Backoff base (seconds)               |
//! | `DB_WAIT_MAX_DELAY`               | --                     | Backoff cap (seconds)                |
//! | `GUNICORN_WORKERS` / `WORKERS`    | `3`                    | Server workers                       |
//! | `GUNICORN_THREADS` / `THREADS`    | `2`                    | Threads per worker                   |
//! | `GUNICORN_TIMEOUT` / `TIMEOUT`    | `120`                  | Request timeout (seconds)            |
//! | `PYTHON_BIN`                      | `python`               | Interpreter for `manage.py`          |
//! | `MANAGE_SCRIPT`                   | `manage.py`            | Management script                    |
//! | `SERVER_BIN`                      | `gunicorn`             | Server executable                    |
//! | `WSGI_APP`                        | `app.wsgi:application` | WSGI target                          |
//! | `ENTRYPOINT_DRY_RUN`              | `false`                | Print the plan as JSON and exit      |
//! | `LOG_FORMAT`                      | `text`                 | `text` or `json`                     |

use std::process::ExitCode;

use container_entrypoint::lifecycle;
use container_entrypoint::observability::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();

    tracing::info!("container-entrypoint v{} starting", env!("CARGO_PKG_VERSION"));

    match lifecycle::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, exit_code = e.exit_code(), "Startup failed");
            ExitCode::from(e.exit_code())
        }
    }
}
