//! Save-then-load round trip over a populated store: every id link must
//! survive the flat files and resolve again on the way back in.

use btoflow::config::DataConfig;
use btoflow::domain::{
    Applicant, Application, ApplicationId, ApplicationKind, ApplicationStatus, Identity, Manager,
    MaritalStatus, Officer, Project, ProjectId, RoomType, User, UserId,
};
use btoflow::store::Store;
use btoflow::{lifecycle, load_store, save_store};
use chrono::NaiveDate;

fn identity(id: &str, name: &str, age: u32, status: MaritalStatus) -> Identity {
    Identity::new(UserId::from(id), name.to_string(), age, status, None).expect("valid identity")
}

fn project(id: &str, manager: &str, officers: Vec<UserId>) -> Project {
    Project::new(
        ProjectId::from(id),
        format!("Project {id}"),
        10,
        "Bishan".to_string(),
        RoomType::TwoRoom,
        265_000.0,
        NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
        Some(UserId::from(manager)),
        5,
        officers,
        true,
    )
}

fn populated_store() -> Store {
    let mut store = Store::new();
    store.add_user(User::Manager(Manager::new(identity(
        "S7000001A",
        "Koh Seng",
        50,
        MaritalStatus::Married,
    ))));

    let mut officer = Officer::new(identity("S2000001C", "Ong Wei", 30, MaritalStatus::Married));
    officer.join_project(ProjectId::from("p-1"));
    officer.register_project(ProjectId::from("p-2"), ApplicationId::from("a-reg"));
    store.add_user(User::Officer(officer));

    store.add_user(User::Applicant(Applicant::new(identity(
        "S1234567A",
        "Tan Mei",
        30,
        MaritalStatus::Married,
    ))));

    store.add_project(project(
        "p-1",
        "S7000001A",
        vec![UserId::from("S2000001C")],
    ));
    store.add_project(project("p-2", "S7000001A", Vec::new()));

    store.add_application(Application::new(
        ApplicationId::from("a-reg"),
        UserId::from("S2000001C"),
        ProjectId::from("p-2"),
        ApplicationKind::ProjectRegistration,
    ));
    store.add_application(Application::new(
        ApplicationId::from("a-bto"),
        UserId::from("S1234567A"),
        ProjectId::from("p-1"),
        ApplicationKind::Bto,
    ));
    lifecycle::update_status(
        &mut store,
        &ApplicationId::from("a-bto"),
        ApplicationStatus::Successful,
    )
    .expect("permitted");

    if let Some(applicant) = store
        .user_mut(&UserId::from("S1234567A"))
        .and_then(User::as_applicant_mut)
    {
        applicant.assign_applied_project(ProjectId::from("p-1"));
        applicant.set_project_application(ApplicationId::from("a-bto"));
    }
    store
}

#[test]
fn save_then_load_preserves_every_link() {
    let store = populated_store();
    let dir = tempfile::tempdir().expect("tempdir");
    let config = DataConfig::new(dir.path());

    save_store(&store, &config).expect("save succeeds");
    let reloaded = load_store(&config);

    assert_eq!(reloaded.users().len(), 3);
    assert_eq!(reloaded.projects().len(), 2);
    assert_eq!(reloaded.applications().len(), 2);

    let officer = reloaded
        .user(&UserId::from("S2000001C"))
        .and_then(User::as_officer)
        .expect("officer survives");
    assert_eq!(officer.joined_projects(), &[ProjectId::from("p-1")]);
    assert_eq!(officer.registered_projects(), &[ProjectId::from("p-2")]);
    assert_eq!(
        officer.project_registrations(),
        &[ApplicationId::from("a-reg")]
    );
    assert!(officer.is_prohibited(&ProjectId::from("p-1")));
    assert!(officer.is_prohibited(&ProjectId::from("p-2")));

    let applicant = reloaded
        .user(&UserId::from("S1234567A"))
        .and_then(User::as_applicant)
        .expect("applicant survives");
    assert_eq!(applicant.applied_project(), Some(&ProjectId::from("p-1")));
    assert_eq!(
        applicant.project_application(),
        Some(&ApplicationId::from("a-bto"))
    );
    assert!(!applicant.can_apply());

    let application = reloaded
        .application(&ApplicationId::from("a-bto"))
        .expect("application survives");
    assert_eq!(application.status(), ApplicationStatus::Successful);

    let reloaded_project = reloaded
        .project(&ProjectId::from("p-1"))
        .expect("project survives");
    assert_eq!(reloaded_project.manager, Some(UserId::from("S7000001A")));
    assert_eq!(
        reloaded_project.officers,
        vec![UserId::from("S2000001C")]
    );
}

#[test]
fn second_save_is_stable() {
    let store = populated_store();
    let dir = tempfile::tempdir().expect("tempdir");
    let config = DataConfig::new(dir.path());

    save_store(&store, &config).expect("first save");
    let first = std::fs::read_to_string(config.officer_file()).expect("file written");

    let reloaded = load_store(&config);
    save_store(&reloaded, &config).expect("second save");
    let second = std::fs::read_to_string(config.officer_file()).expect("file written");

    assert_eq!(first, second);
}
