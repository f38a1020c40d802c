//! `xc-setup init`: scaffold a project with fresh key-pairs and a `.env`.

use std::path::{Path, PathBuf};

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;

use crate::config::Cluster;
use crate::deploy::{Deployer, Deployment};
use crate::env_file::{self, EnvOptions};
use crate::error::Result;
use crate::keypair;
use crate::progress::Progress;
use crate::project::{
    self, ScaffoldGuard, DEFAULT_FACILITATOR_KEYPAIR_PATH, DEFAULT_PAYER_KEYPAIR_PATH,
};
use crate::templates::{self, TemplateContext};

const STEPS: u32 = 5;

/// What to create.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory to create, relative to the parent passed to [`run`].
    pub name: String,
    pub cluster: Cluster,
    /// RPC URL baked into the starter program as its default.
    pub rpc_url: Option<String>,
}

/// What was created.
#[derive(Debug, Clone)]
pub struct InitReport {
    pub project_dir: PathBuf,
    pub payer: Pubkey,
    pub facilitator: Pubkey,
    pub deployment: Deployment,
}

/// Create `<parent>/<name>` and everything in it.
///
/// Fails before touching the filesystem if the target exists. If a later step
/// fails, the partially created directory is removed again.
pub async fn run(
    parent: &Path,
    options: &InitOptions,
    deployer: &dyn Deployer,
    progress: &dyn Progress,
) -> Result<InitReport> {
    let name = &options.name;
    let project_dir = parent.join(name);
    progress.header(&format!("xc-setup init: {name}"));

    progress.step(1, STEPS, &format!("Creating project directory: {name}/"));
    let created_root = project::create_project_dirs(&project_dir)?;
    let guard = ScaffoldGuard::new(&created_root);

    progress.step(2, STEPS, "Generating key-pairs");
    let payer = keypair::generate();
    let facilitator = keypair::generate();
    keypair::save(&payer, &project_dir.join(DEFAULT_PAYER_KEYPAIR_PATH))?;
    keypair::save(&facilitator, &project_dir.join(DEFAULT_FACILITATOR_KEYPAIR_PATH))?;
    progress.key_value("Payer (agent)", &payer.pubkey().to_string());
    progress.key_value("Facilitator (receiver)", &facilitator.pubkey().to_string());

    progress.step(3, STEPS, "Scaffolding project template");
    let context = TemplateContext {
        project_name: name.clone(),
        project_name_literal: templates::rust_string_literal(name),
        crate_name: templates::crate_name(name),
        network: options.cluster.to_string(),
        rpc_url: options
            .rpc_url
            .clone()
            .unwrap_or_else(|| options.cluster.default_rpc_url().to_string()),
        payer_keypair_path: DEFAULT_PAYER_KEYPAIR_PATH.into(),
        facilitator_keypair_path: DEFAULT_FACILITATOR_KEYPAIR_PATH.into(),
    };
    project::write_files(&project_dir, &templates::render_project(&context)?)?;

    progress.step(4, STEPS, "Deploying facilitator program");
    tracing::info!("deploying with {} deployer", deployer.name());
    let deployment = deployer.deploy(&facilitator).await?;
    if let Some(missing) = &deployment.missing {
        progress.warning(&format!(
            "{} not found, using placeholder program id. Install: {}",
            missing.tool_name, missing.install_instructions
        ));
    } else if deployment.placeholder {
        progress.warning("Placeholder deployment: no facilitator program was deployed");
    }
    if let Some(version) = &deployment.toolchain {
        progress.key_value("Solana CLI", &version.to_string());
    }
    progress.key_value("Program id", &deployment.program_id.to_string());

    progress.step(5, STEPS, "Writing configuration (.env)");
    env_file::write(
        &project_dir,
        &EnvOptions {
            payer_public_key: payer.pubkey().to_string(),
            payer_keypair_path: DEFAULT_PAYER_KEYPAIR_PATH.into(),
            facilitator_public_key: facilitator.pubkey().to_string(),
            facilitator_keypair_path: DEFAULT_FACILITATOR_KEYPAIR_PATH.into(),
            facilitator_program_id: deployment.program_id.to_string(),
            network: options.cluster.to_string(),
        },
    )?;

    guard.commit();
    progress.success(&format!("Project '{name}' initialized"));

    Ok(InitReport {
        project_dir,
        payer: payer.pubkey(),
        facilitator: facilitator.pubkey(),
        deployment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use solana_sdk::signature::Keypair;

    use crate::deploy::PlaceholderDeployer;
    use crate::env_file::ENV_FILE;
    use crate::error::XcSetupError;
    use crate::progress::recording::Recorder;
    use crate::project::Project;

    fn options(name: &str) -> InitOptions {
        InitOptions {
            name: name.into(),
            cluster: Cluster::Devnet,
            rpc_url: None,
        }
    }

    fn offline_deployer() -> PlaceholderDeployer {
        PlaceholderDeployer::with_binary("this_tool_does_not_exist_xyz")
    }

    struct FailingDeployer;

    #[async_trait]
    impl Deployer for FailingDeployer {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn deploy(&self, _facilitator: &Keypair) -> Result<Deployment> {
            Err(XcSetupError::Other(anyhow::anyhow!("deploy exploded")))
        }
    }

    #[tokio::test]
    async fn test_init_creates_project_files() {
        let root = tempfile::tempdir().unwrap();
        let progress = Recorder::default();

        let report = run(root.path(), &options("demo"), &offline_deployer(), &progress)
            .await
            .unwrap();

        let dir = root.path().join("demo");
        assert_eq!(report.project_dir, dir);
        for file in [
            "keys/payer.json",
            "keys/facilitator.json",
            ".env",
            "Cargo.toml",
            "src/main.rs",
            "README.md",
            ".gitignore",
        ] {
            assert!(dir.join(file).is_file(), "missing {file}");
        }

        let env = std::fs::read_to_string(dir.join(ENV_FILE)).unwrap();
        let keys: Vec<&str> = env.lines().filter_map(|l| l.split('=').next()).collect();
        for key in [
            env_file::PAYER_PUBLIC_KEY,
            env_file::FACILITATOR_PUBLIC_KEY,
            env_file::FACILITATOR_PROGRAM_ID,
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert!(env.lines().any(|l| l == "NETWORK=devnet"));
    }

    #[tokio::test]
    async fn test_init_output_opens_as_project() {
        let root = tempfile::tempdir().unwrap();
        let report = run(root.path(), &options("demo"), &offline_deployer(), &Recorder::default())
            .await
            .unwrap();

        let project = Project::open(&report.project_dir).unwrap();
        assert_eq!(project.payer.pubkey(), report.payer);
        assert_eq!(project.facilitator.pubkey(), report.facilitator);
        assert_eq!(
            project.env.get(env_file::FACILITATOR_PROGRAM_ID),
            Some(report.facilitator.to_string().as_str())
        );
    }

    #[tokio::test]
    async fn test_init_warns_when_toolchain_missing() {
        let root = tempfile::tempdir().unwrap();
        let progress = Recorder::default();
        run(root.path(), &options("demo"), &offline_deployer(), &progress)
            .await
            .unwrap();

        let warnings = progress.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("placeholder program id"));
    }

    #[tokio::test]
    async fn test_init_existing_directory_untouched() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("demo");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("notes.txt"), "keep me").unwrap();

        let result = run(root.path(), &options("demo"), &offline_deployer(), &Recorder::default()).await;

        assert!(matches!(result, Err(XcSetupError::ProjectExists(_))));
        let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(std::fs::read_to_string(dir.join("notes.txt")).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn test_init_failure_removes_partial_project() {
        let root = tempfile::tempdir().unwrap();
        let result = run(root.path(), &options("demo"), &FailingDeployer, &Recorder::default()).await;

        assert!(result.is_err());
        assert!(!root.path().join("demo").exists());
    }

    #[tokio::test]
    async fn test_init_failure_removes_created_parents() {
        let root = tempfile::tempdir().unwrap();
        let result = run(root.path(), &options("apps/demo"), &FailingDeployer, &Recorder::default()).await;

        assert!(result.is_err());
        assert!(!root.path().join("apps").exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_init_failure_keeps_existing_parent() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("apps")).unwrap();
        let result = run(root.path(), &options("apps/demo"), &FailingDeployer, &Recorder::default()).await;

        assert!(result.is_err());
        assert!(root.path().join("apps").is_dir());
        assert!(!root.path().join("apps/demo").exists());
    }

    #[tokio::test]
    async fn test_init_records_selected_network() {
        let root = tempfile::tempdir().unwrap();
        let opts = InitOptions {
            name: "local".into(),
            cluster: Cluster::Localnet,
            rpc_url: None,
        };
        run(root.path(), &opts, &offline_deployer(), &Recorder::default())
            .await
            .unwrap();

        let env = std::fs::read_to_string(root.path().join("local").join(ENV_FILE)).unwrap();
        assert!(env.lines().any(|l| l == "NETWORK=localnet"));
        let main_rs = std::fs::read_to_string(root.path().join("local/src/main.rs")).unwrap();
        assert!(main_rs.contains("http://127.0.0.1:8899"));
    }
}
