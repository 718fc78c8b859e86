pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_courses.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_courses.sql")),
				"tables/002_tee_times.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_tee_times.sql")),
				"tables/003_upload_batches.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_upload_batches.sql")),
				"tables/004_alert_prefs.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_alert_prefs.sql")),
				"tables/005_device_tokens.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_device_tokens.sql")),
				_ => out.push_str(line),
			}

			out.push('\n');
		} else {
			out.push_str(line);
			out.push('\n');
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::render_schema;

	#[test]
	fn render_schema_should_work() {
		let sql = render_schema();

		assert!(sql.contains("CREATE TABLE IF NOT EXISTS courses"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS tee_times"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS upload_batches"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS alert_prefs"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS device_tokens"));
		assert!(!sql.contains("\\ir"));
	}
}
