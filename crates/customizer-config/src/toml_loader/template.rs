//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Customizer Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[endpoint]
# url = "http://127.0.0.1:8080/admin/settings"
# credential_token = ""
# connect_timeout_ms = 10000   # 100-60000

[dispatch]
# max_retries = 3                # 0-10
# base_delay_ms = 1000           # 10-60000, doubles per retry
# request_timeout_ms = 30000     # 100-300000
# inter_request_delay_ms = 100   # 0-10000
# history_capacity = 50          # 1-10000
# recent_window_secs = 300

[render]
# frame_interval_ms = 16         # 1-1000
# reschedule_delay_ms = 10       # 0-1000
# stats_window = 100

# Extra settings mapped onto a single CSS declaration:
# [[render.rules]]
# key = "notice_border_color"
# selector = ".console-notice"
# property = "border-color"
# important = false

[logging]
# level = "info"                 # trace, debug, info, warn, error
"##
    .to_string()
}
