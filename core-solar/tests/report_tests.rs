use core_solar::{render_report, BrightnessRange, Location};

fn boston() -> Location {
    Location::new(42.3601, -71.0589, "America/New_York").unwrap()
}

fn rows<'a>(report: &'a str, title: &str) -> Vec<&'a str> {
    report
        .lines()
        .skip_while(|line| !line.starts_with(title))
        .skip_while(|line| !line.starts_with("----"))
        .skip(1)
        .take_while(|line| !line.is_empty())
        .collect()
}

#[test]
fn test_report_has_three_reference_days() {
    let report = render_report(2024, &boston(), BrightnessRange::default());

    assert!(report.contains("March Equinox - 2024/03/20"));
    assert!(report.contains("June Solstice - 2024/06/21"));
    assert!(report.contains("December Solstice - 2024/12/21"));
    assert!(report.contains("Location: 42.3601°, -71.0589° (America/New_York)"));
    assert!(report.contains("Brightness range: 2 (min) to 10 (max)"));
    assert!(report.contains("Calculation Method:"));

    assert!(report.contains("Time         Sun Elevation        Brightness      Visual"));
}

#[test]
fn test_one_row_per_local_hour() {
    let report = render_report(2024, &boston(), BrightnessRange::default());

    for title in ["March Equinox", "June Solstice", "December Solstice"] {
        let rows = rows(&report, title);
        assert_eq!(rows.len(), 24, "{title}");
        assert!(rows[0].starts_with("12:00 AM"));
        assert!(rows[12].starts_with("12:00 PM"));
        assert!(rows[23].starts_with("11:00 PM"));
    }
}

#[test]
fn test_rows_show_elevation_brightness_and_bar() {
    let report = render_report(2024, &boston(), BrightnessRange::default());
    let december = rows(&report, "December Solstice");

    let midnight = december[0];
    assert!(midnight.contains("(below)"));
    assert!(!midnight.contains('█'));

    let noon = december[12];
    assert!(noon.contains("24.08°"));
    assert!(!noon.contains("(below)"));
    assert_eq!(noon.chars().filter(|c| *c == '█').count(), 30);

    let june_noon = rows(&report, "June Solstice")[12];
    assert_eq!(june_noon.chars().filter(|c| *c == '█').count(), 40);
}

#[test]
fn test_custom_range_is_reported() {
    let range = BrightnessRange::new(0, 5).unwrap();
    let report = render_report(2024, &boston(), range);
    assert!(report.contains("Brightness range: 0 (min) to 5 (max)"));
}
