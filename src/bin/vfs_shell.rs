//! Summary: Interactive console for the virtual filesystem.
//! Copyright (c) YOAB. All rights reserved.

use std::io::{self, BufRead, Write};

use canopy::{Error, Opened, Vfs};

fn main() {
    let mut vfs = match Vfs::new(".vfs-scratch") {
        Ok(vfs) => vfs,
        Err(err) => {
            eprintln!("failed to start the console: {err}");
            std::process::exit(1);
        }
    };

    println!("Virtual File System Console");
    println!("Type 'help' for available commands");

    let stdin = io::stdin();
    loop {
        print!("{}> ", vfs.pwd());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match execute(&mut vfs, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("{err}"),
        }
    }
}

/// Runs one console command. Returns `Ok(false)` on `exit`.
fn execute(vfs: &mut Vfs, line: &str) -> canopy::Result<bool> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Ok(true),
        ["help"] | ["h"] => {
            print_manual();
            Ok(true)
        }
        ["exit"] => Ok(false),
        ["ls"] => {
            for name in vfs.ls() {
                println!("{name}");
            }
            Ok(true)
        }
        ["pwd"] => {
            println!("{}", vfs.pwd());
            Ok(true)
        }
        [path] => {
            match vfs.open(path)? {
                Opened::Directory => {}
                Opened::File(disk_path) => println!("{}", disk_path.display()),
            }
            Ok(true)
        }
        ["cd", path] => vfs.cd(path).map(|_| true),
        ["mkdir", path] => vfs.mkdir(path).map(|_| true),
        ["touch", path] => vfs.touch(path).map(|_| true),
        ["rmdir", path] => vfs.rmdir(path).map(|_| true),
        ["rm", path] | ["remove", path] => vfs.rm(path).map(|_| true),
        ["open", path] => {
            match vfs.open(path)? {
                Opened::Directory => {}
                Opened::File(disk_path) => println!("{}", disk_path.display()),
            }
            Ok(true)
        }
        ["mv", from, to] | ["move", from, to] => vfs.mv(from, to).map(|_| true),
        ["attach", virt, phys] => vfs.attach(virt, phys).map(|_| true),
        _ => Err(Error::InvalidInput {
            reason: format!("unrecognized command: {line}"),
        }),
    }
}

fn print_manual() {
    println!("cd <path>             change the working directory");
    println!("mkdir <path>          create a directory");
    println!("touch <path>          create a file backed by a scratch file");
    println!("attach <path> <phys>  attach an existing physical file");
    println!("rmdir <path>          remove a directory and its contents");
    println!("rm <path>             remove a file");
    println!("mv <from> <to>        move or rename a node");
    println!("open <path>           enter a directory / print a file's backing path");
    println!("ls                    list the working directory");
    println!("pwd                   print the working directory");
    println!("exit                  leave the console");
}
