//! Log output. On wasm32 formatted events go to the browser console.

use tracing::Level;

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    /// Buffers one formatted event and hands it to `console.log` on drop.
    #[derive(Default)]
    pub(super) struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end();
            if !line.is_empty() {
                web_sys::console::log_1(&line.into());
            }
        }
    }
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init(max_level: Level) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false);

    #[cfg(target_arch = "wasm32")]
    let result = builder
        .without_time()
        .with_writer(console::ConsoleWriter::default)
        .try_init();

    #[cfg(not(target_arch = "wasm32"))]
    let result = builder.try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_twice_is_harmless() {
        super::init(tracing::Level::DEBUG);
        super::init(tracing::Level::INFO);
        tracing::info!("still logging");
    }
}
