use anyhow::Result;

use crate::util::open_switcher;

pub fn exec(json: bool) -> Result<()> {
    let switcher = open_switcher(None)?;
    let identity = switcher.current_identity();

    if json {
        let v = match &identity {
            Some(id) => serde_json::json!({ "name": id.name, "email": id.email }),
            None => serde_json::json!(null),
        };
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    match identity {
        Some(id) => {
            println!("{} <{}>", id.name, id.email);
        }
        None => {
            println!("(not logged in or state store unreadable)");
        }
    }
    Ok(())
}
