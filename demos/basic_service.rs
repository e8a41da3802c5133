//! # Example: basic_service
//!
//! One service, one stdout logger, stopped after a fixed run time or on Ctrl-C.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Service::new("VIS service", LogWriter("[service] "))
//!   ├─► init()                 "initializing : VIS service"
//!   ├─► run()                  worker ticks once per second
//!   ├─► wait 3.5s or a termination signal
//!   ├─► stop()                 "shutting down: VIS service", "shutdown successful"
//!   └─► wait_stopped(grace)    worker logs "stopping service" and exits
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_service
//! ```

use std::{sync::Arc, time::Duration};

use servicekit::{LogWriter, Service, wait_for_shutdown_signal};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let svc = Service::new("VIS service", Arc::new(LogWriter::with_prefix("[service] ")));
    svc.init();
    svc.run();

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_millis(3500)) => {}
        sig = wait_for_shutdown_signal() => {
            println!("received {}", sig?);
        }
    }

    svc.stop();
    svc.wait_stopped(svc.config().grace).await?;
    Ok(())
}
