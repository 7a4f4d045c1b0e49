//! Command flows over an in-memory card and a scripted terminal

use cardvault_cli::{CliError, CliIdentity, EXPLANATION, Terminal, commands};
use cardvault_core::{
    AppendOutcome, DeviceKeyFile, DeviceSecret, KeyUnavailable, Medium, MediumSlot, OwnerId,
    RestoreOutcome, SeededEnv, VaultError, VaultSession,
    medium::{DirMedium, MemoryMedium, VOLUME_ID_FILE},
};
use tempfile::tempdir;

const ALICE: OwnerId = OwnerId::new(0x6943_050F);
const BOB: OwnerId = OwnerId::new(0x0000_0B0B);

fn terminal(input: &'static str) -> Terminal<&'static [u8], Vec<u8>> {
    Terminal::new(input.as_bytes(), Vec::new())
}

fn output(terminal: Terminal<&'static [u8], Vec<u8>>) -> String {
    String::from_utf8(terminal.into_output()).unwrap()
}

async fn save_all(medium: &MemoryMedium, device: &DeviceSecret, entries: &[(OwnerId, &str)]) {
    let mut session = VaultSession::new(medium, device, SeededEnv::new(5));
    let mut term = terminal("");
    for (owner, secret) in entries {
        let outcome =
            commands::save(&mut session, &mut term, *owner, Some((*secret).to_string())).await;
        assert!(matches!(outcome, Ok(AppendOutcome::Saved { .. })));
    }
}

#[test]
fn init_medium_writes_identity_once() {
    let dir = tempdir().unwrap();
    let medium = DirMedium::new(dir.path());
    let env = SeededEnv::new(3);

    assert!(commands::init_medium(&medium, &env).unwrap());
    let first = std::fs::read(dir.path().join(VOLUME_ID_FILE)).unwrap();
    assert_eq!(first.len(), 33);

    assert!(!commands::init_medium(&medium, &env).unwrap());
    assert_eq!(std::fs::read(dir.path().join(VOLUME_ID_FILE)).unwrap(), first);
}

#[test]
fn init_medium_on_missing_mount_fails() {
    let dir = tempdir().unwrap();
    let medium = DirMedium::new(dir.path().join("not-mounted"));

    assert!(matches!(
        commands::init_medium(&medium, &SeededEnv::new(3)),
        Err(CliError::Medium(_))
    ));
}

#[tokio::test]
async fn save_reads_secret_from_input() {
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
    let mut term = terminal("typed secret\n");

    let outcome = commands::save(&mut session, &mut term, ALICE, None).await.unwrap();

    assert_eq!(outcome, AppendOutcome::Saved { count: 1 });
    assert_eq!(session.load().unwrap()[0].secret.expose(), "typed secret");
    assert!(output(term).contains("Saved."));
}

#[tokio::test]
async fn save_rejects_empty_secret() {
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
    let mut term = terminal("\n");

    let outcome = commands::save(&mut session, &mut term, ALICE, None).await;

    assert!(matches!(outcome, Err(CliError::EmptySecret)));
    assert_eq!(medium.write_count(), 0);
}

#[tokio::test]
async fn save_cancelled_at_prompt() {
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    medium.eject();
    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
    let mut term = terminal("c\n");

    let outcome = commands::save(&mut session, &mut term, ALICE, Some("x".into())).await;

    assert_eq!(outcome.unwrap(), AppendOutcome::Cancelled);
    let shown = output(term);
    assert!(shown.contains("Insert the card"));
    assert!(shown.contains("Not saved."));
}

#[tokio::test]
async fn list_shows_labels_only() {
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    save_all(&medium, &device, &[(ALICE, "alpha"), (ALICE, "apple"), (BOB, "azure")]).await;

    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
    let mut term = terminal("");

    assert_eq!(commands::list(&mut session, &mut term, None).await, 3);

    let shown = output(term);
    assert!(shown.contains("al***"));
    assert!(!shown.contains("alpha"));
}

#[tokio::test]
async fn list_empty_card() {
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
    let mut term = terminal("");

    assert_eq!(commands::list(&mut session, &mut term, Some(ALICE)).await, 0);
    assert!(output(term).contains("No saved passphrases."));
}

#[tokio::test]
async fn restore_hands_back_chosen_secret() {
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    save_all(&medium, &device, &[(ALICE, "alpha"), (ALICE, "apple")]).await;

    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
    let mut term = terminal("1\n");
    let mut identity = CliIdentity::new(ALICE, None);

    let outcome = commands::restore(&mut session, &mut term, &mut identity).await.unwrap();

    assert_eq!(outcome, RestoreOutcome::Restored { owner: ALICE });
    assert_eq!(identity.take_restored().unwrap().expose(), "apple");

    let shown = output(term);
    assert!(shown.contains(EXPLANATION));
    assert!(shown.contains("== [0F056943] ==\nPassphrase restored."));
}

#[tokio::test]
async fn restore_explanation_shown_once() {
    let dir = tempdir().unwrap();
    let marker = dir.path().join("device.key.seen");
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    save_all(&medium, &device, &[(ALICE, "alpha")]).await;

    for expect_explanation in [true, false] {
        let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
        let mut term = terminal("").with_selection(Some(0));
        let mut identity = CliIdentity::new(ALICE, Some(marker.clone()));

        commands::restore(&mut session, &mut term, &mut identity).await.unwrap();

        assert_eq!(output(term).contains(EXPLANATION), expect_explanation);
    }
}

#[tokio::test]
async fn restore_of_foreign_entry_fails() {
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    save_all(&medium, &device, &[(BOB, "azure")]).await;

    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
    let mut term = terminal("").with_selection(Some(0));
    let mut identity = CliIdentity::new(ALICE, None);

    let result = commands::restore(&mut session, &mut term, &mut identity).await;

    assert!(matches!(result, Err(CliError::Vault(_))));
    assert!(identity.take_restored().is_none());
    assert!(output(term).contains("== Fail =="));
}

#[tokio::test]
async fn restore_filtered_to_owner() {
    let medium = MemoryMedium::new(b"card".to_vec());
    let device = DeviceSecret::from_material(b"device");
    save_all(&medium, &device, &[(BOB, "azure"), (ALICE, "alpha")]).await;

    let mut session =
        VaultSession::new(&medium, &device, SeededEnv::new(1)).with_owner_filter(true);
    let mut term = terminal("").with_selection(Some(0));
    let mut identity = CliIdentity::new(ALICE, None);

    let outcome = commands::restore(&mut session, &mut term, &mut identity).await.unwrap();

    assert_eq!(outcome, RestoreOutcome::Restored { owner: ALICE });
    assert_eq!(identity.take_restored().unwrap().expose(), "alpha");
}

#[tokio::test]
async fn restore_from_directory_card() {
    let dir = tempdir().unwrap();
    let medium = DirMedium::new(dir.path());
    commands::init_medium(&medium, &SeededEnv::new(9)).unwrap();
    let device = DeviceSecret::from_material(b"device");

    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(1));
    let mut term = terminal("");
    commands::save(&mut session, &mut term, ALICE, Some("on disk".into())).await.unwrap();

    let slot = medium.acquire().unwrap();
    assert!(slot.exists(&slot.root_path().join(".fseventsd.")).unwrap());
    drop(slot);

    let mut later = VaultSession::new(&medium, &device, SeededEnv::new(2));
    let mut term = terminal("0\n");
    let mut identity = CliIdentity::new(ALICE, None);
    commands::restore(&mut later, &mut term, &mut identity).await.unwrap();

    assert_eq!(identity.take_restored().unwrap().expose(), "on disk");
}

#[tokio::test]
async fn missing_key_file_reads_as_empty_vault() {
    let dir = tempdir().unwrap();
    let medium = MemoryMedium::new(b"card".to_vec());
    save_all(&medium, &DeviceSecret::from_material(b"device"), &[(ALICE, "alpha")]).await;
    let key_file = DeviceKeyFile::new(dir.path().join("missing.key"));

    let mut session = VaultSession::new(&medium, &key_file, SeededEnv::new(1));
    let mut term = terminal("");
    assert_eq!(commands::list(&mut session, &mut term, None).await, 0);
    assert!(output(term).contains("No saved passphrases."));

    let mut session = VaultSession::new(&medium, &key_file, SeededEnv::new(1));
    let mut term = terminal("").with_selection(Some(0));
    let mut identity = CliIdentity::new(ALICE, None);

    let outcome = commands::restore(&mut session, &mut term, &mut identity).await.unwrap();

    assert_eq!(outcome, RestoreOutcome::Unavailable);
    assert!(identity.take_restored().is_none());
    assert!(output(term).contains("No saved passphrases."));
}

#[tokio::test]
async fn save_without_key_file_shows_failure() {
    let dir = tempdir().unwrap();
    let medium = MemoryMedium::new(b"card".to_vec());
    let key_file = DeviceKeyFile::new(dir.path().join("missing.key"));

    let mut session = VaultSession::new(&medium, &key_file, SeededEnv::new(1));
    let mut term = terminal("");
    let result = commands::save(&mut session, &mut term, ALICE, Some("alpha".into())).await;

    assert!(matches!(
        result,
        Err(CliError::Vault(VaultError::KeyUnavailable(KeyUnavailable::MasterSecret(_))))
    ));
    assert_eq!(medium.write_count(), 0);
    assert!(output(term).contains("== Fail =="));
}

#[tokio::test]
async fn key_file_is_read_when_the_vault_is_opened() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("device.key");
    let medium = MemoryMedium::new(b"card".to_vec());
    save_all(&medium, &DeviceSecret::from_material(b"device"), &[(ALICE, "alpha")]).await;

    let key_file = DeviceKeyFile::new(&path);
    std::fs::write(&path, b"device").unwrap();

    let mut session = VaultSession::new(&medium, &key_file, SeededEnv::new(1));
    let mut term = terminal("");

    assert_eq!(commands::list(&mut session, &mut term, None).await, 1);
}
