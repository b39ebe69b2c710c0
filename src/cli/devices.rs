use tabled::Table;

use crate::{cli::auth, session::Session, utils, warning};

pub async fn devices(session: &Session) {
    if !auth(session).await {
        return;
    }
    let Some(credential) = session.credentials().get().await else {
        return;
    };

    match session.service().list_devices(&credential).await {
        Ok(devices) => {
            let table = Table::new(utils::device_table_rows(&devices));
            println!("{}", table);
        }
        Err(e) => warning!("Failed to list devices. Err: {}", e),
    }
}
