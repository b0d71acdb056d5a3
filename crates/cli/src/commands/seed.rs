use cadastro_db::{connect_with_config, migrations, DemoClientes, SeedResult, VerificationResult};

use crate::commands::{prepare, CommandResult};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seeded = DemoClientes::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 6u8))?;

        let verification = DemoClientes::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        pool.close().await;

        if verification.all_present {
            Ok(seeded)
        } else {
            Err(("seed_verification", verification_failure_message(&verification), 6u8))
        }
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", summary(&seeded)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary(seeded: &SeedResult) -> String {
    let mut message = format!(
        "demo clientes loaded: {} inserted, {} already present",
        seeded.inserted.len(),
        seeded.skipped.len()
    );
    if !seeded.blocked.is_empty() {
        message.push_str(&format!(
            ", {} blocked by an existing nome (cnpj: {})",
            seeded.blocked.len(),
            seeded.blocked.join(", ")
        ));
    }
    message
}

fn verification_failure_message(verification: &VerificationResult) -> String {
    let missing = verification
        .checks
        .iter()
        .filter_map(|(cnpj, present)| (!present).then_some(*cnpj))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        "some demo clientes failed to load".to_string()
    } else {
        format!("demo clientes missing after seed (cnpj): {}", missing.join(", "))
    }
}
