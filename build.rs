use std::process::Command;

use time::OffsetDateTime;
use time::macros::format_description;

fn main() {
  println!("cargo:rerun-if-changed=.git/HEAD");

  let build_time = OffsetDateTime::now_utc()
    .format(format_description!(
      "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
    ))
    .unwrap_or_else(|_| "unknown".to_string());
  println!("cargo:rustc-env=BUILD_TIME_HUMAN={}", build_time);

  let commit = Command::new("git")
    .args(["rev-parse", "--short", "HEAD"])
    .output()
    .ok()
    .filter(|o| o.status.success())
    .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
    .unwrap_or_else(|| "unknown".to_string());
  println!("cargo:rustc-env=GIT_COMMIT_SHORT={}", commit);
}
