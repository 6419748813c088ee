fn main() -> Result<(), Box<dyn std::error::Error>> {
    boxdb::build!("schema/model.json")?;

    Ok(())
}
