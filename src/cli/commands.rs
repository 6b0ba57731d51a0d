use std::fs::File;
use std::io::Write;

use chrono::NaiveDate;
use tracing::info;

use super::{
    AgendaArgs, ChildAddArgs, ChildCommand, Command, EventAddArgs, EventCommand,
    GuardianAddArgs, GuardianCommand, ItemAddArgs, ItemCommand, RoutineAddArgs, RoutineCommand,
    RunArgs, SensoryArgs,
};
use crate::agenda;
use crate::domain::validators::{format_date, format_time};
use crate::domain::{
    CalendarEvent, Child, ChildId, ChildInput, EventId, Guardian, GuardianId, GuardianInput,
    ItemId, Person, Recurrence, Routine, RoutineId, RoutineItem, SensoryProfile,
};
use crate::error::AppError;
use crate::household::Household;

/// Run one command against the loaded household. Returns whether anything
/// needs saving.
pub(super) fn execute(
    command: Command,
    household: &mut Household,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    match command {
        Command::Guardian { command } => guardian(command, household, today, out),
        Command::Child { command } => child(command, household, today, out),
        Command::Routine { command } => routine(command, household, today, out),
        Command::Event { command } => event(command, household, out),
        Command::Agenda(args) => {
            show_agenda(args, household, today, out)?;
            Ok(false)
        }
    }
}

fn guardian(
    command: GuardianCommand,
    household: &mut Household,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    match command {
        GuardianCommand::Add(args) => {
            let GuardianAddArgs {
                name,
                birth_date,
                email,
                phone,
                guardian_type,
                address,
                national_id,
                max_children,
                id,
            } = args;
            let id = id.map(GuardianId::new).unwrap_or_else(GuardianId::generate);
            let input = GuardianInput {
                name,
                birth_date,
                email,
                phone,
                guardian_type,
                address,
                national_id,
                max_children,
            };

            let guardian = household.register_guardian(id, input, today)?;
            writeln!(
                out,
                "Registered guardian {} ({})",
                guardian.name(),
                guardian.id()
            )?;
            Ok(true)
        }
        GuardianCommand::List => {
            let mut any = false;
            for guardian in household.guardians() {
                any = true;
                writeln!(out, "{}", guardian_line(guardian))?;
            }
            if !any {
                writeln!(out, "No guardians registered.")?;
            }
            Ok(false)
        }
        GuardianCommand::Show { id } => {
            let id = GuardianId::new(id);
            let guardian = household.guardian(&id)?;
            writeln!(out, "{}", guardian.name())?;
            writeln!(out, "  id:            {}", guardian.id())?;
            writeln!(
                out,
                "  born:          {} (age {})",
                format_date(guardian.birth_date()),
                guardian.age(today)
            )?;
            writeln!(out, "  relationship:  {}", guardian.guardian_type())?;
            writeln!(out, "  email:         {}", guardian.email())?;
            writeln!(out, "  phone:         {}", guardian.phone().unwrap_or("-"))?;
            writeln!(out, "  address:       {}", guardian.address().unwrap_or("-"))?;
            writeln!(
                out,
                "  national id:   {}",
                guardian.national_id().unwrap_or("-")
            )?;
            writeln!(
                out,
                "  children:      {}/{}",
                guardian.children().len(),
                guardian.max_children()
            )?;
            for child in household.children_of(&id)? {
                writeln!(out, "    - {}", child_line(child, today))?;
            }
            Ok(false)
        }
    }
}

fn child(
    command: ChildCommand,
    household: &mut Household,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    match command {
        ChildCommand::Add(args) => {
            let ChildAddArgs {
                guardian,
                name,
                birth_date,
                support_level,
                id,
            } = args;
            let id = id.map(ChildId::new).unwrap_or_else(ChildId::generate);
            let input = ChildInput {
                name,
                birth_date,
                support_level,
                sensory_profile: None,
            };

            let child = household.register_child(id, &GuardianId::new(guardian), input, today)?;
            writeln!(out, "Registered child {} ({})", child.name(), child.id())?;
            Ok(true)
        }
        ChildCommand::List { guardian } => {
            let children: Vec<&Child> = match guardian {
                Some(guardian_id) => household.children_of(&GuardianId::new(guardian_id))?,
                None => household.children().collect(),
            };
            if children.is_empty() {
                writeln!(out, "No children registered.")?;
            }
            for child in children {
                writeln!(out, "{}", child_line(child, today))?;
            }
            Ok(false)
        }
        ChildCommand::Remove { id } => {
            let removed = household.remove_child(&ChildId::new(id))?;
            writeln!(
                out,
                "Removed child {} with their routines and events",
                removed.name()
            )?;
            Ok(true)
        }
        ChildCommand::Sensory(args) => set_sensory(args, household, out),
    }
}

fn set_sensory(
    args: SensoryArgs,
    household: &mut Household,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    let SensoryArgs {
        id,
        tactile_sensitivities,
        tactile_preferences,
        auditory_sensitivities,
        auditory_preferences,
        visual_sensitivities,
        visual_preferences,
        clear,
    } = args;

    let profile = SensoryProfile {
        tactile_sensitivities,
        tactile_preferences,
        auditory_sensitivities,
        auditory_preferences,
        visual_sensitivities,
        visual_preferences,
    };
    let profile = match (clear, profile.is_empty()) {
        (true, _) => None,
        (false, false) => Some(profile),
        (false, true) => {
            return Err(AppError::Usage(
                "provide at least one sensory field, or --clear".to_string(),
            ))
        }
    };

    let child = household.set_sensory_profile(&ChildId::new(id), profile)?;
    let verb = if child.sensory_profile().is_some() {
        "Updated"
    } else {
        "Cleared"
    };
    writeln!(out, "{verb} sensory profile for {}", child.name())?;
    Ok(true)
}

fn routine(
    command: RoutineCommand,
    household: &mut Household,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    match command {
        RoutineCommand::Add(args) => add_routine(args, household, out),
        RoutineCommand::Show { id } => {
            let routine = household.routine(&RoutineId::new(id))?;
            render_routine(routine, out)?;
            Ok(false)
        }
        RoutineCommand::List { child } => {
            let routines: Vec<&Routine> = match child {
                Some(child_id) => {
                    let child_id = ChildId::new(child_id);
                    household.child(&child_id)?;
                    household.routines_for(&child_id)
                }
                None => household.routines().collect(),
            };
            if routines.is_empty() {
                writeln!(out, "No routines registered.")?;
            }
            for routine in routines {
                writeln!(
                    out,
                    "{}  {}  {}  {} steps",
                    routine.id(),
                    routine.name(),
                    describe_recurrence(routine.recurrence()),
                    routine.items().len()
                )?;
            }
            Ok(false)
        }
        RoutineCommand::Templates => {
            for (index, name) in Routine::suggest_fixed_templates().iter().enumerate() {
                writeln!(out, "{}. {}", index + 1, name)?;
            }
            Ok(false)
        }
        RoutineCommand::Check { id, date } => {
            let routine = household.routine(&RoutineId::new(id))?;
            let answer = if routine.applies_on_date(date) {
                "applies"
            } else {
                "does not apply"
            };
            writeln!(out, "{} {} on {}", routine.name(), answer, format_date(date))?;
            Ok(false)
        }
        RoutineCommand::Item { command } => item(command, household, out),
        RoutineCommand::Run(args) => record_run(args, household, today, out),
    }
}

fn add_routine(
    args: RoutineAddArgs,
    household: &mut Household,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    let RoutineAddArgs {
        child,
        name,
        template,
        recurrence,
        date,
        weekdays,
        id,
    } = args;

    let name = match (name, template) {
        (Some(name), _) => name,
        (None, Some(position)) => position
            .checked_sub(1)
            .and_then(|index| Routine::suggest_fixed_templates().get(index))
            .map(|name| name.to_string())
            .ok_or_else(|| AppError::Usage(format!("no routine template at position {position}")))?,
        (None, None) => {
            return Err(AppError::Usage(
                "provide --name or --template".to_string(),
            ))
        }
    };

    let recurrence = Recurrence::from_parts(recurrence, date, &weekdays)?;
    let id = id.map(RoutineId::new).unwrap_or_else(RoutineId::generate);
    let routine = Routine::new(id, ChildId::new(child), &name, recurrence)?;

    let routine = household.add_routine(routine)?;
    writeln!(
        out,
        "Created routine {} ({}), {}",
        routine.name(),
        routine.id(),
        describe_recurrence(routine.recurrence())
    )?;
    Ok(true)
}

fn item(
    command: ItemCommand,
    household: &mut Household,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    match command {
        ItemCommand::Add(args) => {
            let ItemAddArgs {
                routine,
                name,
                description,
                start,
                end,
                order,
            } = args;
            let routine = household.routine_mut(&RoutineId::new(routine))?;

            let item_id = match order {
                Some(order) => {
                    let item =
                        RoutineItem::new(ItemId::generate(), &name, description, start, end, order)?;
                    let item_id = item.id().clone();
                    routine.register_item(item)?;
                    item_id
                }
                None => routine.register_item_auto(&name, description, start, end)?,
            };

            let position = routine.item(&item_id).map_or(0, RoutineItem::order);
            writeln!(
                out,
                "Added step {} at position {} ({})",
                name.trim(),
                position,
                item_id
            )?;
            Ok(true)
        }
        ItemCommand::Move {
            routine,
            item,
            order,
        } => {
            let routine = household.routine_mut(&RoutineId::new(routine))?;
            routine.reorder_item(&ItemId::new(item), order)?;
            render_routine(routine, out)?;
            Ok(true)
        }
        ItemCommand::Remove { routine, item } => {
            let routine = household.routine_mut(&RoutineId::new(routine))?;
            let removed = routine.remove_item(&ItemId::new(item))?;
            writeln!(
                out,
                "Removed step {} from {}",
                removed.name(),
                routine.name()
            )?;
            Ok(true)
        }
    }
}

fn record_run(
    args: RunArgs,
    household: &mut Household,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    let RunArgs {
        routine,
        date,
        items,
        notes,
    } = args;
    let date = date.unwrap_or(today);
    let completed: Vec<ItemId> = items
        .iter()
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(ItemId::new)
        .collect();

    let routine = household.routine_mut(&RoutineId::new(routine))?;
    routine.record_execution(date, &completed, notes)?;

    let done = routine
        .executions()
        .last()
        .map_or(0, |execution| execution.completed_items.len());
    writeln!(
        out,
        "Recorded {} on {}: {}/{} steps completed",
        routine.name(),
        format_date(date),
        done,
        routine.items().len()
    )?;
    Ok(true)
}

fn event(
    command: EventCommand,
    household: &mut Household,
    out: &mut dyn Write,
) -> Result<bool, AppError> {
    match command {
        EventCommand::Add(args) => {
            let EventAddArgs {
                child,
                title,
                date,
                description,
                id,
            } = args;
            let id = id.map(EventId::new).unwrap_or_else(EventId::generate);
            let event = household.add_event(id, &title, &ChildId::new(child), date, description)?;
            writeln!(
                out,
                "Added event {} on {} ({})",
                event.title(),
                format_date(event.date()),
                event.id()
            )?;
            Ok(true)
        }
        EventCommand::List { child, date } => {
            let child = child.map(ChildId::new);
            let mut events: Vec<&CalendarEvent> = household
                .events()
                .filter(|event| child.as_ref().map_or(true, |id| event.child_id() == id))
                .filter(|event| date.map_or(true, |day| event.date() == day))
                .collect();
            events.sort_by(|a, b| (a.date(), a.title()).cmp(&(b.date(), b.title())));

            if events.is_empty() {
                writeln!(out, "No events found.")?;
            }
            for event in events {
                writeln!(
                    out,
                    "{}  {}  {}  {}",
                    format_date(event.date()),
                    event.title(),
                    event.description().unwrap_or("-"),
                    event.id()
                )?;
            }
            Ok(false)
        }
        EventCommand::Remove { id } => {
            let removed = household.remove_event(&EventId::new(id))?;
            writeln!(
                out,
                "Removed event {} on {}",
                removed.title(),
                format_date(removed.date())
            )?;
            Ok(true)
        }
    }
}

fn show_agenda(
    args: AgendaArgs,
    household: &Household,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let from = args.from.unwrap_or(today);
    let to = args.to.unwrap_or(from);
    let entries = agenda::build(household, from, to);

    if entries.is_empty() {
        writeln!(
            out,
            "Nothing scheduled between {} and {}.",
            format_date(from),
            format_date(to)
        )?;
    }
    for entry in &entries {
        writeln!(
            out,
            "{}  {:<7}  {}  {}  {}",
            format_date(entry.date),
            entry.kind,
            entry.child_name,
            entry.title,
            entry.detail
        )?;
    }

    if let Some(path) = args.csv {
        let file = File::create(&path)?;
        agenda::write_csv(file, &entries)?;
        info!(path = %path.display(), rows = entries.len(), "exported agenda");
        writeln!(out, "Wrote {} rows to {}", entries.len(), path.display())?;
    }
    Ok(())
}

fn render_routine(routine: &Routine, out: &mut dyn Write) -> Result<(), AppError> {
    writeln!(
        out,
        "{} ({}), {}",
        routine.name(),
        routine.id(),
        describe_recurrence(routine.recurrence())
    )?;
    if routine.items().is_empty() {
        writeln!(out, "  no steps yet")?;
    }
    for item in routine.items() {
        let window = match (item.start_time(), item.end_time()) {
            (Some(start), Some(end)) => format!(" {}-{}", format_time(start), format_time(end)),
            (Some(start), None) => format!(" from {}", format_time(start)),
            (None, Some(end)) => format!(" until {}", format_time(end)),
            (None, None) => String::new(),
        };
        writeln!(
            out,
            "  {}. {}{} ({})",
            item.order(),
            item.name(),
            window,
            item.id()
        )?;
        if let Some(description) = item.description() {
            writeln!(out, "     {description}")?;
        }
    }
    Ok(())
}

fn describe_recurrence(recurrence: &Recurrence) -> String {
    match recurrence {
        Recurrence::SingleDate(date) => format!("once on {}", format_date(*date)),
        Recurrence::EveryDay => "every day".to_string(),
        Recurrence::SpecificWeekdays(days) => {
            let names: Vec<String> = days.iter().map(|day| day.to_string()).collect();
            format!("on {}", names.join(", "))
        }
    }
}

fn guardian_line(guardian: &Guardian) -> String {
    format!(
        "{}  {}  {}  {}/{} children",
        guardian.id(),
        guardian.name(),
        guardian.email(),
        guardian.children().len(),
        guardian.max_children()
    )
}

fn child_line(child: &Child, today: NaiveDate) -> String {
    format!(
        "{}  {}  age {}  {} support  guardian {}",
        child.id(),
        child.name(),
        child.age(today),
        child.support_level(),
        child.guardian_id()
    )
}
