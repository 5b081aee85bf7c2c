//! Fraud Detection Dashboard
//!
//! Terminal client for the fraud-scoring API: collects transaction fields
//! from the operator, derives the log-amount feature, posts the record to
//! /predict, and renders the verdict.

use anyhow::Result;
use fraud_scoring_api::features;
use serde_json::json;
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> Result<()> {
    let api_url = std::env::var("API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let client = reqwest::Client::new();

    println!("💳 AI-Based Financial Fraud Detection");
    println!("Posting to {}/predict (set API_URL to override)", api_url);
    println!("Enter an empty line to quit.");
    println!();

    let stdin = io::stdin();
    loop {
        let Some(amount) = prompt_f64(&stdin, "Transaction Amount: ")? else {
            break;
        };
        let Some(hour) = prompt_hour(&stdin)? else {
            break;
        };

        let amount_log = features::amount_log(amount);
        println!("💡 Log Amount (auto): {:.4}", amount_log);

        let payload = json!({
            "amount_log": amount_log,
            "hour": hour,
            "Amount": amount,
        });
        println!("Input JSON: {}", payload);

        let response = client
            .post(format!("{}/predict", api_url))
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let result: serde_json::Value = resp.json().await?;
                let probability = result["fraud_probability"].as_f64().unwrap_or(0.0);
                let flagged = result["fraud_flag"].as_bool().unwrap_or(false);

                println!("Fraud Probability: {:.2}%", probability * 100.0);
                if flagged {
                    println!("🚨 Transaction is Fraudulent!");
                } else {
                    println!("✅ Transaction appears Legitimate.");
                }
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                println!("API Error {}: {}", status.as_u16(), body);
            }
            Err(e) => {
                println!("⚠️ Unable to connect to API: {}", e);
            }
        }
        println!();
    }

    Ok(())
}

/// Prompt for one line; None means quit (empty line or EOF).
fn prompt_line(stdin: &io::Stdin, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}

fn prompt_f64(stdin: &io::Stdin, label: &str) -> Result<Option<f64>> {
    loop {
        let Some(line) = prompt_line(stdin, label)? else {
            return Ok(None);
        };
        match line.parse::<f64>() {
            Ok(value) if value >= 0.0 => return Ok(Some(value)),
            _ => println!("Please enter a non-negative number."),
        }
    }
}

fn prompt_hour(stdin: &io::Stdin) -> Result<Option<u32>> {
    loop {
        let Some(line) = prompt_line(stdin, "Transaction Hour (0-23): ")? else {
            return Ok(None);
        };
        match line.parse::<u32>() {
            Ok(hour) if hour <= 23 => return Ok(Some(hour)),
            _ => println!("Please enter an hour between 0 and 23."),
        }
    }
}
