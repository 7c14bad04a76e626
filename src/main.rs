use std::io::{self, Write};

use anyhow::Result;
use log::info;

use prepmate::config::ApiConfig;
use prepmate::interview::{GenerateInput, InterviewService, Phase, SessionController};

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ApiConfig::from_env();
    println!("\n=== PrepMate Mock Interview ===");
    println!("Backend: {}\n", config.base_url);

    let controller = SessionController::new(InterviewService::new(config));

    let job_role = prompt("Job role: ")?;
    let company = prompt("Company: ")?;

    println!("\nGenerating questions (a cold backend can take up to a minute)...");
    if let Err(e) = controller
        .generate(GenerateInput {
            job_role,
            company,
            ..GenerateInput::default()
        })
        .await
    {
        eprintln!("Could not generate questions: {}", e);
        std::process::exit(1);
    }

    let session = controller.snapshot();
    println!("\nGot {} questions:", session.questions.len());
    for (i, question) in session.questions.iter().enumerate() {
        println!(
            "  {}. [{} / {}] {}",
            i + 1,
            question.question_type.as_str(),
            question.difficulty.as_str(),
            question.text
        );
    }

    prompt("\nPress Enter to start the mock interview...")?;
    controller.start_mock()?;
    info!("Mock interview underway");

    loop {
        let session = controller.snapshot();
        if session.phase != Phase::Mock {
            break;
        }

        let number = session.current_index + 1;
        let total = session.questions.len();
        if let Some(question) = session.current_question() {
            println!("\n--- Question {}/{} ---", number, total);
            println!("{}", question.text);
        }

        // Retry the same question until feedback arrives.
        loop {
            let answer = prompt("\nYour answer: ")?;
            controller.set_answer(&answer);
            match controller.submit_answer().await {
                Ok(()) => break,
                Err(e) => eprintln!("{}", e),
            }
        }

        let session = controller.snapshot();
        println!("\nFeedback ({}s): {}", session.elapsed_seconds, session.feedback);

        let wants_follow_up = prompt("Request a follow-up question? [y/N] ")?;
        if wants_follow_up.eq_ignore_ascii_case("y") {
            controller.request_follow_up().await?;
            println!("Follow-up: {}", controller.snapshot().follow_up);
        }

        controller.advance()?;
    }

    println!("\n=== Interview complete - well done! ===");
    Ok(())
}
