use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ucms_client::listing::{RegistrationQuery, Searchable, departments};
use ucms_client::models::{LoginRequest, ResultSummary, Role};
use ucms_client::navigation::{authorize, dashboard_route, nav_links};
use ucms_client::services::{CourseService, EnrollmentService, GradingService};
use ucms_client::{ApiClient, ClientConfig, ClientError, FileSessionStore};

const USAGE: &str = "usage: ucms <command> [args]

commands:
  login <username> <password>
  logout
  whoami
  menu
  courses [search]
  overview
  enroll <course-id>
  drop <course-id>
  my-courses [search]
  results
  grade <course-id> <student-id> <marks> [remarks]
  release <course-id>";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ucms_client=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args).await {
        tracing::debug!("command failed: {:?}", e);
        eprintln!("{}", e.user_message());
        if let Some(route) = e.redirect() {
            eprintln!("Run `ucms login` to sign in again ({}).", route.path());
        }
        std::process::exit(1);
    }
}

fn arg<'a>(args: &'a [String], idx: usize, name: &str) -> Result<&'a str, ClientError> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| ClientError::Validation(format!("missing <{}>\n\n{}", name, USAGE)))
}

fn id_arg(args: &[String], idx: usize, name: &str) -> Result<i64, ClientError> {
    arg(args, idx, name)?
        .parse()
        .map_err(|_| ClientError::Validation(format!("<{}> must be a number", name)))
}

async fn require_role(api: &ApiClient, allowed: &[Role]) -> Result<(), ClientError> {
    let user = api.current_user().await;
    authorize(user.as_ref(), allowed).map_err(|route| match user {
        None => ClientError::Auth("You are not logged in. Run `ucms login` first.".to_string()),
        Some(_) => ClientError::Validation(format!(
            "This command is not available for your role ({}).",
            route.path()
        )),
    })
}

async fn run(args: &[String]) -> Result<(), ClientError> {
    let config = ClientConfig::new_from_env()?;
    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let api = Arc::new(ApiClient::new(config, store)?);

    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    match command.as_str() {
        "login" => {
            let credentials = LoginRequest {
                username: arg(args, 1, "username")?.to_string(),
                password: arg(args, 2, "password")?.to_string(),
            };
            let session = api.login(&credentials).await?;
            println!(
                "Welcome, {}! Dashboard: {}",
                session.user.display_name(),
                dashboard_route(session.user.role).path()
            );
        }
        "logout" => {
            api.logout().await?;
            println!("Signed out.");
        }
        "whoami" => match api.current_user().await {
            Some(user) => println!("{} <{}> [{}]", user.display_name(), user.email, user.role),
            None => println!("Not signed in."),
        },
        "menu" => {
            let user = api.current_user().await;
            for link in nav_links(user.as_ref()) {
                println!("{:<12} {}", link.label, link.route.path());
            }
        }
        "courses" => {
            let search = args.get(1).map(String::as_str).unwrap_or("");
            let courses = CourseService::new(api.clone()).list().await?;
            for course in courses.iter().filter(|c| c.matches(search)) {
                println!(
                    "{:>5}  {:<10} {:<40} {} cr  {}/{}",
                    course.id,
                    course.code,
                    course.name,
                    course.credits,
                    course.current_enrollments,
                    course.max_enrollments
                );
            }
            println!("Departments: {}", departments(&courses).join(", "));
        }
        "overview" => {
            require_role(&api, &[Role::Student]).await?;
            let overview = EnrollmentService::new(api.clone()).overview().await?;
            for course in &overview.available {
                let mark = if overview.is_registered(course.id) { "x" } else { " " };
                println!("[{}] {:>5}  {:<10} {}", mark, course.id, course.code, course.name);
            }
            println!("{} registered course(s)", overview.registered.len());
        }
        "enroll" => {
            require_role(&api, &[Role::Student]).await?;
            let course_id = id_arg(args, 1, "course-id")?;
            let registration = EnrollmentService::new(api.clone()).register(course_id).await?;
            println!("Registered for {}.", registration.course_code);
        }
        "drop" => {
            require_role(&api, &[Role::Student]).await?;
            let course_id = id_arg(args, 1, "course-id")?;
            EnrollmentService::new(api.clone()).unregister(course_id).await?;
            println!("Unregistered from course {}.", course_id);
        }
        "my-courses" => {
            require_role(&api, &[Role::Student]).await?;
            let query = RegistrationQuery {
                search: args.get(1).cloned().unwrap_or_default(),
                ..Default::default()
            };
            let registrations = EnrollmentService::new(api.clone()).my_courses().await?;
            for r in query.apply(&registrations) {
                println!(
                    "{:<10} {:<40} {} cr  {:?}",
                    r.course_code, r.course_title, r.credits, r.status
                );
            }
        }
        "results" => {
            require_role(&api, &[Role::Student]).await?;
            let results = GradingService::new(api.clone()).my_results().await?;
            for r in &results {
                println!(
                    "{:<10} {:>6.1}%  {:<2}  {}",
                    r.course_code,
                    r.marks,
                    r.grade.as_str(),
                    r.grade.description()
                );
            }
            let summary = ResultSummary::from_results(&results);
            println!("GPA {:.2} over {} credits", summary.gpa, summary.total_credits);
        }
        "grade" => {
            require_role(&api, &[Role::Lecturer]).await?;
            let course_id = id_arg(args, 1, "course-id")?;
            let student_id = id_arg(args, 2, "student-id")?;
            let marks = arg(args, 3, "marks")?;
            let remarks = args.get(4).map(String::as_str).unwrap_or("");
            GradingService::new(api.clone())
                .submit_grade(course_id, student_id, marks, remarks)
                .await?;
            println!("Grade submitted.");
        }
        "release" => {
            require_role(&api, &[Role::Lecturer]).await?;
            let course_id = id_arg(args, 1, "course-id")?;
            GradingService::new(api.clone()).release_results(course_id).await?;
            println!("Results released.");
        }
        _ => println!("{}", USAGE),
    }

    Ok(())
}
