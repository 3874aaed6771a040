use std::io::ErrorKind;
use std::process::Stdio;

use tokio::process::Command;

/// Checks that both media tools can be started.
///
/// Failures are logged and reported as `false`; the service still starts, since
/// thumbnail uploads do not need either tool.
pub async fn run_self_check(ffprobe_path: &str, ffmpeg_path: &str) -> bool {
    let ffprobe_ok = check_can_run(ffprobe_path).await;
    let ffmpeg_ok = check_can_run(ffmpeg_path).await;
    ffprobe_ok && ffmpeg_ok
}

async fn check_can_run(bin_path: &str) -> bool {
    let output = Command::new(bin_path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            tracing::debug!("ok: can run {bin_path}");
            true
        }
        Ok(output) => {
            tracing::error!(
                "{bin_path} self check failed:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
            false
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::error!("Could not find {bin_path}. Is it installed?");
            false
        }
        Err(err) => {
            tracing::error!("Error running {bin_path}: {err}");
            false
        }
    }
}
