use eujim_portal::{
    listings::{
        employer_request_view, graduate_profile_view, job_posting_view, medium_date,
        seed_employer_requests, status_badge,
    },
    table::{FieldValue, Record},
};

#[test]
fn test_status_badge_capitalizes() {
    assert_eq!(status_badge(&FieldValue::from("pending")), "Pending");
    assert_eq!(status_badge(&FieldValue::from("approved")), "Approved");
    assert_eq!(status_badge(&FieldValue::Missing), "");
}

#[test]
fn test_medium_date_formats() {
    assert_eq!(
        medium_date(&FieldValue::from("2023-06-15T09:24:00Z")),
        "Jun 15, 2023"
    );
    assert_eq!(medium_date(&FieldValue::from("2024-03-05")), "Mar 5, 2024");
    assert_eq!(medium_date(&FieldValue::from("yesterday")), "yesterday");
}

#[test]
fn test_employer_requests_record_exposes_camel_case_keys() {
    let request = &seed_employer_requests()[0];
    assert_eq!(
        request.field("companyName"),
        FieldValue::from("Tech Innovations Ltd")
    );
    assert_eq!(request.field("status"), FieldValue::from("pending"));
    assert!(request.field("unknown").is_missing());
}

#[test]
fn test_employer_request_view_filters_by_status() {
    let mut view = employer_request_view(10);
    assert_eq!(view.total_filtered_count(), 5);

    view.set_search_term("pending");
    assert_eq!(view.total_filtered_count(), 3);

    let page = view.render_page();
    assert!(page.rows.iter().all(|row| row.cells[5] == "Pending"));
    assert_eq!(page.rows[0].cells[4], "Jun 15, 2023");
}

#[test]
fn test_employer_request_view_sorts_by_date_descending() {
    let mut view = employer_request_view(10);
    view.toggle_sort("dateSubmitted");
    view.toggle_sort("dateSubmitted");

    let keys: Vec<String> = view.render_page().rows.into_iter().map(|r| r.key).collect();
    assert_eq!(keys, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn test_job_view_renders_salary_and_featured() {
    let mut view = job_posting_view(10);
    view.toggle_sort("postedDate");
    let page = view.render_page();

    // 2024-03-10 is the UI/UX internship.
    assert_eq!(page.rows[0].key, "3");
    assert_eq!(page.rows[0].cells[4], "KES 30,000");
    assert_eq!(page.rows[0].cells[5], "Mar 10, 2024");

    let featured = page.rows.iter().find(|r| r.key == "1").unwrap();
    assert_eq!(featured.cells[0], "Junior Software Developer (Featured)");

    let undisclosed = page.rows.iter().find(|r| r.key == "2").unwrap();
    assert_eq!(undisclosed.cells[4], "Not disclosed");
}

#[test]
fn test_job_view_salary_is_not_sortable() {
    let mut view = job_posting_view(10);
    view.toggle_sort("salary");
    assert_eq!(view.view_state().sort_field, None);
}

#[test]
fn test_job_view_searches_skills() {
    let mut view = job_posting_view(10);
    view.set_search_term("docker");
    let page = view.render_page();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].key, "4");
}

#[test]
fn test_graduate_view_sorts_by_year_and_renders_shortlist() {
    let mut view = graduate_profile_view(2);
    view.toggle_sort("graduationYear");

    let page = view.render_page();
    assert_eq!(page.total_pages, 2);
    // Stable: 2022 graduates in seed order.
    assert_eq!(page.rows[0].cells[0], "Michael Chen");
    assert_eq!(page.rows[0].cells[5], "Yes");
    assert_eq!(page.rows[1].cells[0], "David Mwangi");
    assert_eq!(page.rows[1].cells[5], "No");
}
