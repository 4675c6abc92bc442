use super::support::{data_store, output_lines, FakeAccount};
use loadimpact_cli::api::models::UserScenario;
use loadimpact_cli::commands::data_store::{conversion_message, wait_for_conversion, write_data_stores};
use loadimpact_cli::commands::organization::{write_organizations, write_projects};
use loadimpact_cli::commands::test::write_tests;
use loadimpact_cli::commands::user_scenario::write_scenarios;
use loadimpact_cli::commands::MISSING_PROJECT_MESSAGE;
use std::time::Duration;

const TEST_HEADER: &str = "ID:\tNAME:\tLAST RUN DATE:\tCONFIG:";

#[test]
fn test_list_tests_of_one_project() {
    let api = FakeAccount::new(1, 1, 3);
    let mut out = Vec::new();
    write_tests(&api, &[1], &mut out).unwrap();
    let lines = output_lines(out);

    assert_eq!(*api.test_calls.borrow(), vec![1]);
    assert_eq!(api.test_run_calls.get(), 3);
    assert_eq!(api.organization_calls.get(), 0);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], TEST_HEADER);
    assert!(lines[1].starts_with("1\tTest1\t"));
    assert!(lines[3].starts_with("3\tTest3\t"));
}

#[test]
fn test_list_tests_of_several_projects() {
    let api = FakeAccount::new(1, 2, 3);
    let mut out = Vec::new();
    write_tests(&api, &[2, 1, 2], &mut out).unwrap();
    let lines = output_lines(out);

    // duplicates collapse and projects are visited in id order
    assert_eq!(*api.test_calls.borrow(), vec![1, 2]);
    assert_eq!(api.test_run_calls.get(), 6);
    assert_eq!(lines.len(), 7);
    assert!(lines[4].starts_with("4\tTest4\t"));
}

#[test]
fn test_list_tests_without_project_walks_every_organization() {
    let api = FakeAccount::new(2, 2, 3);
    let mut out = Vec::new();
    write_tests(&api, &[], &mut out).unwrap();
    let lines = output_lines(out);

    assert_eq!(api.organization_calls.get(), 1);
    assert_eq!(api.project_calls.get(), 2);
    assert_eq!(*api.test_calls.borrow(), vec![1, 2, 3, 4]);
    assert_eq!(api.test_run_calls.get(), 12);
    assert_eq!(lines.len(), 13);
    assert!(lines[12].starts_with("12\tTest12\t"));
}

#[test]
fn test_list_tests_rows_show_placeholders() {
    let api = FakeAccount::new(1, 1, 1);
    let mut out = Vec::new();
    write_tests(&api, &[1], &mut out).unwrap();

    assert_eq!(output_lines(out)[1], "1\tTest1\t-\t-");
}

#[test]
fn test_organizations_and_projects() {
    let api = FakeAccount::new(2, 2, 0);

    let mut out = Vec::new();
    write_organizations(&api, &mut out).unwrap();
    assert_eq!(output_lines(out), vec!["1\tOrganization1", "2\tOrganization2"]);

    let mut out = Vec::new();
    write_projects(&api, 2, &mut out).unwrap();
    assert_eq!(output_lines(out), vec!["3\tProject3", "4\tProject4"]);
}

#[test]
fn test_data_store_list() {
    let mut api = FakeAccount::new(1, 1, 0);
    api.data_stores = vec![
        data_store(1, "First datastore", 2),
        data_store(2, "Second datastore", 2),
    ];

    let mut out = Vec::new();
    write_data_stores(&api, Some(1), &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "ID:\tNAME:\n1\tFirst datastore\n2\tSecond datastore\n"
    );
}

#[test]
fn test_data_store_list_needs_project() {
    let api = FakeAccount::new(1, 1, 0);
    let mut out = Vec::new();
    write_data_stores(&api, None, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", MISSING_PROJECT_MESSAGE));
    assert_eq!(MISSING_PROJECT_MESSAGE, "You need to provide a project id.");
}

#[test]
fn test_user_scenario_list() {
    let mut api = FakeAccount::new(1, 1, 0);
    api.scenarios = vec![UserScenario {
        id: 225,
        name: "Checkout".to_string(),
        script: String::new(),
        project_id: Some(1),
        data_store_ids: Vec::new(),
    }];

    let mut out = Vec::new();
    write_scenarios(&api, Some(1), &mut out).unwrap();
    assert_eq!(output_lines(out), vec!["ID:\tNAME:", "225\tCheckout"]);
}

#[test]
fn test_user_scenario_list_needs_project() {
    let api = FakeAccount::new(1, 1, 0);
    let mut out = Vec::new();
    write_scenarios(&api, None, &mut out).unwrap();

    assert_eq!(output_lines(out), vec![MISSING_PROJECT_MESSAGE]);
}

#[test]
fn test_conversion_waits_until_finished() {
    let api = FakeAccount::new(1, 1, 0);
    api.data_store_polls
        .borrow_mut()
        .extend([data_store(9, "users", 1), data_store(9, "users", 2)]);

    let done = wait_for_conversion(&api, data_store(9, "users", 0), Duration::ZERO).unwrap();

    assert_eq!(api.data_store_calls.get(), 2);
    assert_eq!(
        conversion_message(&done),
        "Data store conversion completed with status 'finished'"
    );
}

#[test]
fn test_finished_conversion_is_not_polled() {
    let api = FakeAccount::new(1, 1, 0);
    let done = wait_for_conversion(&api, data_store(9, "users", 3), Duration::ZERO).unwrap();

    assert_eq!(api.data_store_calls.get(), 0);
    assert_eq!(
        conversion_message(&done),
        "Data store conversion completed with status 'failed'"
    );
}
