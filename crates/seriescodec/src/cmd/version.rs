use seriescodec_codec::{DEFAULT_MAX_MESSAGE_SIZE, HEADER_SIZE};
use seriescodec_series::DataType;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("seriescodec {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: seriescodec");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SERIESCODEC_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("header_bytes: {HEADER_SIZE}");
    println!("max_message_bytes: {DEFAULT_MAX_MESSAGE_SIZE}");
    let types: Vec<&str> = DataType::ALL.iter().map(|dt| dt.name()).collect();
    println!("data_types: {}", types.join(", "));

    Ok(SUCCESS)
}
