/// ----- MONITOR MODULE -----
/// Redraw-in-place status table for the whole fleet, refreshed on a tick
/// while the simulation runs. Enabled with the `live_monitor` flag in the
/// configuration file.
use std::io::{stdout, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{select, tick};
use crossterm::{cursor, terminal, ExecutableCommand, Result};

use crate::controller::DispatchController;
use crate::fleet::Fleet;

const UPDATE_FREQ: f64 = 0.2;

pub fn main(
    fleet: Arc<Fleet>,
    controller: Arc<DispatchController>,
    running: Arc<AtomicBool>,
) -> Result<()> {
    let mut stdout = stdout();
    let timer = tick(Duration::from_secs_f64(UPDATE_FREQ));
    let status_size = fleet.units().len() as u16 * 2 + 4;

    for _ in 0..status_size {
        writeln!(stdout)?;
    }

    while running.load(Ordering::SeqCst) {
        select! {
            recv(timer) -> _ => {
                print_status(&mut stdout, &fleet, &controller, status_size)?;
            },
        }
    }
    Ok(())
}

fn print_status(
    stdout: &mut Stdout,
    fleet: &Fleet,
    controller: &DispatchController,
    status_size: u16,
) -> Result<()> {
    stdout.execute(cursor::MoveUp(status_size))?;
    stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

    writeln!(
        stdout,
        "+------+-------+-----------+-------+--------+----------------------+"
    )?;
    writeln!(
        stdout,
        "| {0:<4} | {1:<5} | {2:<9} | {3:<5} | {4:<14} | {5:<20} |",
        "UNIT", "FLOOR", "DIRECTION", "DOORS", "RIDERS", "QUEUE"
    )?;
    for unit in fleet.units() {
        writeln!(
            stdout,
            "+------+-------+-----------+-------+--------+----------------------+"
        )?;
        let direction = match unit.direction() {
            Some(direction) => direction.as_str(),
            None => "idle",
        };
        let doors = if unit.doors_open() { "open" } else { "shut" };
        let riders: Vec<u32> = unit
            .passengers_snapshot()
            .iter()
            .map(|passenger| passenger.serial)
            .collect();
        let queue = format!("{:?}", unit.queue_snapshot());
        writeln!(
            stdout,
            "| {0:<4} | {1:<5} | {2:<9} | {3:<5} | {4:<14} | {5:<20} |",
            unit.id(),
            unit.current_floor(),
            direction,
            doors,
            format!("{riders:?}"),
            queue
        )?;
    }
    writeln!(
        stdout,
        "+------+-------+-----------+-------+--------+----------------------+"
    )?;
    writeln!(
        stdout,
        "  pending backlog: {:?}",
        controller.backlog_snapshot()
    )?;

    Ok(())
}
