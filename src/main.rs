// Main entry point that forwards to the library's main
fn main() {
    std::process::exit(match voxel_forge::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            e.downcast_ref::<voxel_forge::AppError>()
                .map_or(1, voxel_forge::AppError::exit_code)
        }
    });
}
